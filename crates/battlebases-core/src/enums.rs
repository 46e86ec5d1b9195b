//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// The two opposing factions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Red, Team::Blue];

    /// The faction this team fights.
    pub fn enemy(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    /// Direction of travel along the lane toward enemy territory.
    pub fn direction(self) -> f64 {
        match self {
            Team::Red => 1.0,
            Team::Blue => -1.0,
        }
    }

    /// Lane coordinate of this team's home edge.
    pub fn home_x(self) -> f64 {
        match self {
            Team::Red => 0.0,
            Team::Blue => crate::constants::LANE_LENGTH,
        }
    }
}

/// What sort of combatant a fighter is. Capabilities hang off the tag
/// instead of a type hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FighterKind {
    /// A unit that walks the lane and fights in melee.
    Mobile,
    /// A base-mounted gun. Engages many targets one at a time and cannot be hit.
    StaticDefense,
    /// A team's headquarters. Never attacks; losing it loses the match.
    MainBase,
    /// A spawner structure. Never attacks; battles against it can be interrupted.
    Outpost,
}

impl FighterKind {
    /// Structures never walk and make any battle they are in interruptible.
    pub fn is_structure(self) -> bool {
        !matches!(self, FighterKind::Mobile)
    }

    /// Whether fighters of this kind may ever be given an attack.
    pub fn can_ever_attack(self) -> bool {
        matches!(self, FighterKind::Mobile | FighterKind::StaticDefense)
    }

    /// Whether fighters of this kind can be damaged at all.
    pub fn can_be_targeted(self) -> bool {
        !matches!(self, FighterKind::StaticDefense)
    }

    /// Whether a busy fighter of this kind lines new targets up behind the
    /// current one instead of dropping its current target.
    pub fn queues_targets(self) -> bool {
        matches!(self, FighterKind::StaticDefense)
    }
}

/// Battle status as seen from outside the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleStatus {
    Active,
    Paused,
}

/// Walk cycle phase of a mobile unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalkPhase {
    /// Covering ground during a walk turn.
    #[default]
    Walking,
    /// Waiting out the pause between walk turns.
    Resting,
    /// Held in place by combat or a blocking enemy.
    Halted,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Setup,
    Active,
    Paused,
    MatchOver,
}
