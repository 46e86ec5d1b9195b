//! Player commands sent from the host to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::Team;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Build the battlefield and start the match.
    StartMatch,
    /// Buy a unit from the purchase list and spawn it at one of the team's outposts.
    PurchaseUnit {
        team: Team,
        /// Outpost slot, counted from the team's base.
        outpost: u32,
        /// Name of the offer on the purchase list.
        unit: String,
    },
    /// Set time scale (1.0 = normal, 2.0 = double).
    SetTimeScale { scale: f64 },
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
}
