//! Perception geometry for the stealth simulation.
//!
//! Field-of-view cones, distance falloff of visibility,
//! and capsule-cast line-of-sight probing.

pub use stealth_core as core;

pub mod falloff;
pub mod fov;
pub mod los;
pub mod scene;

// Re-export key types for convenience.
pub use falloff::{effective_visibility, inverse_lerp};
pub use fov::in_field_of_view;
pub use los::{has_line_of_sight, line_of_sight_origins, CapsuleCast, PhysicsQuery};
pub use scene::{SceneBody, SphereScene};
