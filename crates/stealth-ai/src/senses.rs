//! World queries a spotter needs while ticking.

use stealth_core::types::{ColliderHandle, Pose};

/// Read-only view of the world from one spotter's perspective.
pub trait Senses {
    /// Pose of the spotter being ticked.
    fn spotter_pose(&self) -> Pose;

    /// Current pose of a spy, or `None` if it no longer exists.
    fn spy_pose(&self, spy: ColliderHandle) -> Option<Pose>;

    /// Whether any part of the spy's silhouette is unobstructed.
    fn line_of_sight(&self, spy: ColliderHandle) -> bool;
}
