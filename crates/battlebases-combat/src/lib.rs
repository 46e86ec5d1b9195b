//! Combat rules for BattleBases.
//!
//! Fighter records, initiative resolution and the two-party battle state
//! machine. No ECS dependency; the simulation crate owns the world and feeds
//! fighters in and out of these types by value.

pub mod battle;
pub mod error;
pub mod fighter;
pub mod initiative;

pub use battle::{AttackReport, Battle, BattleOutcome, BattleState, TickReport};
pub use error::CombatError;
pub use fighter::{DamageOutcome, Fighter};
pub use initiative::{Initiative, WalkProgress};

pub use battlebases_core as core;

#[cfg(test)]
mod tests;
