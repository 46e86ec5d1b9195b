//! Fundamental identifiers and simulation types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable handle for a fighter. Wraps the bits of the owning ECS entity, so a
/// destroyed fighter's id simply stops resolving instead of dangling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FighterId(pub u64);

impl fmt::Display for FighterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of a battle: its participant pair, normalised so the lower id
/// comes first. Two battles between the same fighters share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BattleKey {
    pub low: FighterId,
    pub high: FighterId,
}

impl BattleKey {
    pub fn new(a: FighterId, b: FighterId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn contains(&self, fighter: FighterId) -> bool {
        self.low == fighter || self.high == fighter
    }
}

impl fmt::Display for BattleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.low, self.high)
    }
}

/// Position along the lane (world units). Red's edge is 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LanePosition {
    pub x: f64,
}

impl LanePosition {
    pub fn new(x: f64) -> Self {
        Self { x }
    }

    pub fn distance_to(&self, other: &LanePosition) -> f64 {
        (other.x - self.x).abs()
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}
