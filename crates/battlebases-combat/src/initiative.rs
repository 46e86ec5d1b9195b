//! Initiative: which side of a new battle strikes first.

use rand::Rng;

/// How far a combatant has got into its current walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkProgress {
    pub walking: bool,
    /// Distance covered so far in the current walk turn.
    pub distance: f64,
}

impl WalkProgress {
    pub fn new(walking: bool, elapsed_walk_time: f64, walk_speed: f64) -> Self {
        Self {
            walking,
            distance: (elapsed_walk_time * walk_speed).max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initiative {
    First,
    Second,
}

/// Decide initiative between two combatants. `None` means the combatant cannot
/// move at all.
///
/// Movers beat non-movers and walkers beat non-walkers. Between two walkers the
/// one further into its walk is proportionally more likely to win. Every other
/// case goes to the second-listed side. At most one value is drawn from `rng`.
pub fn resolve<R: Rng + ?Sized>(
    first: Option<WalkProgress>,
    second: Option<WalkProgress>,
    rng: &mut R,
) -> Initiative {
    match (first, second) {
        (Some(_), None) => Initiative::First,
        (None, _) => Initiative::Second,
        (Some(a), Some(b)) => match (a.walking, b.walking) {
            (true, false) => Initiative::First,
            (false, _) => Initiative::Second,
            (true, true) => {
                let total = a.distance + b.distance;
                if !(total > 0.0 && total.is_finite()) {
                    return Initiative::Second;
                }
                if rng.gen_range(0.0..total) < a.distance {
                    Initiative::First
                } else {
                    Initiative::Second
                }
            }
        },
    }
}
