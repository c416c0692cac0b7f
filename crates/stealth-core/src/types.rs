//! Fundamental geometric and identity types.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Identity of a collision proxy. Spotters, spies and props are all
/// addressed by the handle of the collider that represents them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ColliderHandle(pub u32);

impl std::fmt::Display for ColliderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bit mask over collision layers (32 layers).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Mask containing a single layer.
    pub const fn layer(index: u8) -> Self {
        Self(1u32 << (index as u32 % 32))
    }

    pub const fn contains(self, layer: u8) -> bool {
        self.0 & (1u32 << (layer as u32 % 32)) != 0
    }

    pub const fn union(self, other: LayerMask) -> Self {
        Self(self.0 | other.0)
    }
}

/// World placement of an actor.
/// y = Up. `position` is the ground anchor ("feet").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pose {
    pub position: Vec3,
    /// Facing direction. Not required to be normalized.
    pub forward: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::Z,
        }
    }
}

impl Pose {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }

    /// Squared distance between the two ground anchors.
    pub fn distance_squared(&self, other: &Pose) -> f32 {
        self.position.distance_squared(other.position)
    }
}

/// Upright capsule dimensions used as the reference body for sight casts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capsule {
    pub radius: f32,
    /// Total height including both hemispheres.
    pub height: f32,
}

impl Capsule {
    pub fn new(radius: f32, height: f32) -> Self {
        Self { radius, height }
    }

    /// Distance from the capsule centre to the centre of either end cap.
    pub fn half_segment(&self) -> f32 {
        (self.height * 0.5 - self.radius).max(0.0)
    }

    /// Height of the eye anchor above the ground anchor.
    pub fn eye_height(&self) -> f32 {
        (self.height - self.radius).max(0.0)
    }
}

/// Where and heading which way a spy was last observed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LastSeen {
    pub position: Vec3,
    pub direction: Vec3,
}

impl From<Pose> for LastSeen {
    fn from(pose: Pose) -> Self {
        Self {
            position: pose.position,
            direction: pose.forward.normalize_or_zero(),
        }
    }
}
