//! Simulation engine for the stealth perception system.
//!
//! Owns the hecs ECS world, routes trigger overlaps and rating changes
//! from spies to spotters, fans out the fixed-frequency stealth tick,
//! and produces `StealthSnapshot`s for debug views and replays.

pub mod engine;
pub mod error;
pub mod manager;
pub mod prop;
pub mod spy;
pub mod systems;

pub use stealth_core as core;
pub use engine::StealthEngine;
pub use error::SimError;
pub use manager::StealthManager;
pub use prop::StealthProp;
pub use spy::{Notice, Spy, SpyNotice};
