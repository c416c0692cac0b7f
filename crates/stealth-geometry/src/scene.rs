//! Headless physics scene made of spheres.
//!
//! Implements [`PhysicsQuery`] without a physics engine so the simulation
//! can run in tests and offline tools. Casts are swept spheres of the cast
//! radius; the capsule's core segment is not modelled.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use stealth_core::types::{ColliderHandle, Pose};

use crate::los::{CapsuleCast, PhysicsQuery};

/// A spherical collider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneBody {
    pub handle: ColliderHandle,
    pub center: Vec3,
    pub radius: f32,
    pub layer: u8,
    /// Height of the centre above an actor's ground anchor, applied when
    /// the body follows an actor via [`PhysicsQuery::sync_actor`].
    #[serde(default)]
    pub elevation: f32,
}

impl SceneBody {
    pub fn new(handle: ColliderHandle, center: Vec3, radius: f32, layer: u8) -> Self {
        Self {
            handle,
            center,
            radius,
            layer,
            elevation: 0.0,
        }
    }

    /// A body that tracks an actor, centred `elevation` above its anchor.
    pub fn actor(handle: ColliderHandle, anchor: Vec3, elevation: f32, radius: f32, layer: u8) -> Self {
        Self {
            handle,
            center: anchor + Vec3::Y * elevation,
            radius,
            layer,
            elevation,
        }
    }

    /// Distance along the ray at which a sphere of `sweep_radius` first
    /// touches this body, if within `max_distance`.
    fn sweep(&self, origin: Vec3, direction: Vec3, sweep_radius: f32, max_distance: f32) -> Option<f32> {
        let reach = self.radius + sweep_radius;
        let to_origin = origin - self.center;
        let c = to_origin.length_squared() - reach * reach;
        if c <= 0.0 {
            // Already overlapping at the start of the sweep.
            return Some(0.0);
        }
        let b = to_origin.dot(direction);
        if b > 0.0 {
            return None;
        }
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let t = -b - discriminant.sqrt();
        (t <= max_distance).then_some(t.max(0.0))
    }
}

/// A flat list of sphere colliders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SphereScene {
    bodies: Vec<SceneBody>,
}

impl SphereScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, body: SceneBody) {
        self.bodies.retain(|b| b.handle != body.handle);
        self.bodies.push(body);
    }

    pub fn remove(&mut self, handle: ColliderHandle) -> Option<SceneBody> {
        let index = self.bodies.iter().position(|b| b.handle == handle)?;
        Some(self.bodies.swap_remove(index))
    }

    pub fn body(&self, handle: ColliderHandle) -> Option<&SceneBody> {
        self.bodies.iter().find(|b| b.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl PhysicsQuery for SphereScene {
    fn capsule_cast(&self, cast: &CapsuleCast) -> Option<ColliderHandle> {
        self.bodies
            .iter()
            .filter(|body| cast.mask.contains(body.layer))
            .filter_map(|body| {
                body.sweep(cast.origin, cast.direction, cast.radius, cast.max_distance)
                    .map(|t| (t, body.handle))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, handle)| handle)
    }

    fn sync_actor(&mut self, handle: ColliderHandle, pose: &Pose) {
        if let Some(body) = self.bodies.iter_mut().find(|b| b.handle == handle) {
            body.center = pose.position + Vec3::Y * body.elevation;
        }
    }

    fn remove_actor(&mut self, handle: ColliderHandle) {
        self.remove(handle);
    }
}
