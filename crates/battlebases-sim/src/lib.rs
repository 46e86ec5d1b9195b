//! Simulation engine for BattleBases.
//!
//! Owns the hecs ECS world and the combat scheduler, runs systems at a fixed
//! tick rate, and produces GameStateSnapshots for the host.

pub mod engine;
pub mod scheduler;
pub mod spawn;
pub mod systems;
pub mod world_setup;

pub use battlebases_core as core;
pub use engine::{SimConfig, SimulationEngine};
pub use scheduler::{CombatScheduler, ContactOutcome};
