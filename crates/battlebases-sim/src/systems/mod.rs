//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions over `&mut World` (or `&World` for read-only).
//! Long-lived state they need, like battles and treasuries, is passed in by
//! the engine.

pub mod cleanup;
pub mod contact;
pub mod economy;
pub mod snapshot;
pub mod walk;
