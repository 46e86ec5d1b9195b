//! BattleBases host.
//!
//! Runs the simulation engine on its own thread at a fixed tick rate, feeds
//! it player commands over a channel, and keeps the latest snapshot for
//! polling. Also carries a simple autopilot that spends each team's funds.

pub mod autopilot;
pub mod game_loop;
pub mod state;

pub use battlebases_core as core;
