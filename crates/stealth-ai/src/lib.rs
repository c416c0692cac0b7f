//! Spotter AI for the stealth simulation.
//!
//! Implements the per-spotter perception state machine, the reaction
//! hooks game code plugs into, and the memory of spies already judged
//! innocent. No ECS dependency; operates on plain data.

pub mod behavior;
pub mod ignore;
pub mod senses;
pub mod spotter;

pub use stealth_core as core;

pub use behavior::{PassiveBehavior, SpotterBehavior};
pub use ignore::IgnoreList;
pub use senses::Senses;
pub use spotter::Spotter;

#[cfg(test)]
mod tests;
