//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components. The combat record itself
//! (`Fighter`) lives in `battlebases-combat` next to the rules that mutate it.

use serde::{Deserialize, Serialize};

use crate::enums::{Team, WalkPhase};

/// Lane walking state of a mobile unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Walker {
    /// Distance covered in one walk turn (world units).
    pub walk_speed: f64,
    /// Length of a walk turn, and of the rest that follows it (seconds).
    pub turn_time: f64,
    /// Time spent walking in the current turn (seconds).
    pub cur_walk_time: f64,
    /// Time left before the next walk turn starts (seconds, only while resting).
    pub rest_remaining: f64,
    pub phase: WalkPhase,
}

/// How close an enemy must come before contact is reported.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ContactRange {
    pub reach: f64,
}

/// Marks an outpost as a spawner for its team.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Spawner {
    pub team: Team,
    /// Index of this outpost among its team's outposts, counted from the base.
    pub slot: u32,
    /// Lane coordinate where units bought at this outpost appear.
    pub spawn_x: f64,
}

/// Name of the archetype an entity was built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Archetype {
    pub name: String,
}
