//! Line-of-sight probing with capsule casts.
//!
//! A single ray is easily blocked by a thin post while most of a body is
//! in plain view, so the probe casts a capsule sized like the reference
//! spy body from five origins around the observer's anchor: the anchor
//! itself plus offsets above, below and to either side of the sight line.
//! The target counts as seen if any cast's first hit is the target.

use glam::Vec3;

use stealth_core::constants::LOS_SAMPLE_COUNT;
use stealth_core::types::{Capsule, ColliderHandle, LayerMask, Pose};

/// One capsule sweep request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleCast {
    /// Centre of the capsule at the start of the sweep.
    pub origin: Vec3,
    /// Unit sweep direction.
    pub direction: Vec3,
    pub radius: f32,
    /// Half length of the capsule's vertical core segment.
    pub half_segment: f32,
    pub max_distance: f32,
    pub mask: LayerMask,
}

/// Geometry queries supplied by the host's physics engine.
pub trait PhysicsQuery {
    /// Sweep a capsule and return the nearest collider hit on `cast.mask`.
    fn capsule_cast(&self, cast: &CapsuleCast) -> Option<ColliderHandle>;

    /// Called whenever the simulation moves an actor. Engines that track
    /// their own proxies can ignore it.
    fn sync_actor(&mut self, _handle: ColliderHandle, _pose: &Pose) {}

    /// Called when an actor leaves the simulation.
    fn remove_actor(&mut self, _handle: ColliderHandle) {}
}

/// The five cast origins around `from` for a sight line toward `to`.
pub fn line_of_sight_origins(from: Vec3, to: Vec3, capsule: &Capsule) -> [Vec3; LOS_SAMPLE_COUNT] {
    let direction = (to - from).normalize_or_zero();
    let mut side = direction.cross(Vec3::Y).normalize_or_zero();
    if side == Vec3::ZERO {
        // Looking straight up or down.
        side = Vec3::X;
    }
    let mut up = side.cross(direction).normalize_or_zero();
    if up == Vec3::ZERO {
        up = Vec3::Y;
    }

    let top = up * capsule.half_segment();
    let lateral = side * capsule.radius;
    [from, from + top, from - top, from + lateral, from - lateral]
}

/// Check whether `target` is visible from `from` when aiming at `to`.
///
/// No hit at all counts as blocked: the target must actually be struck.
pub fn has_line_of_sight<P: PhysicsQuery + ?Sized>(
    physics: &P,
    from: Vec3,
    to: Vec3,
    target: ColliderHandle,
    capsule: &Capsule,
    mask: LayerMask,
) -> bool {
    line_of_sight_origins(from, to, capsule)
        .iter()
        .any(|origin| {
            let offset = to - *origin;
            let distance = offset.length();
            if distance < f32::EPSILON {
                return false;
            }
            let cast = CapsuleCast {
                origin: *origin,
                direction: offset / distance,
                radius: capsule.radius,
                half_segment: capsule.half_segment(),
                max_distance: distance + capsule.radius,
                mask,
            };
            physics.capsule_cast(&cast) == Some(target)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{SceneBody, SphereScene};

    const WALL_LAYER: u8 = 0;
    const SPY_LAYER: u8 = 8;
    const SPY: ColliderHandle = ColliderHandle(100);

    fn mask() -> LayerMask {
        LayerMask::layer(WALL_LAYER).union(LayerMask::layer(SPY_LAYER))
    }

    fn capsule() -> Capsule {
        Capsule::new(0.3, 1.8)
    }

    /// Scene with the spy's head at (0, 1.5, 10).
    fn scene_with_spy() -> SphereScene {
        let mut scene = SphereScene::new();
        scene.add(SceneBody::new(SPY, Vec3::new(0.0, 1.5, 10.0), 0.4, SPY_LAYER));
        scene
    }

    #[test]
    fn test_los_clear() {
        let scene = scene_with_spy();
        assert!(has_line_of_sight(
            &scene,
            Vec3::new(0.0, 1.5, 0.0),
            Vec3::new(0.0, 1.5, 10.0),
            SPY,
            &capsule(),
            mask(),
        ));
    }

    #[test]
    fn test_los_blocked_by_wall() {
        let mut scene = scene_with_spy();
        scene.add(SceneBody::new(ColliderHandle(1), Vec3::new(0.0, 1.5, 5.0), 3.0, WALL_LAYER));
        assert!(!has_line_of_sight(
            &scene,
            Vec3::new(0.0, 1.5, 0.0),
            Vec3::new(0.0, 1.5, 10.0),
            SPY,
            &capsule(),
            mask(),
        ));
    }

    #[test]
    fn test_los_partial_silhouette_visible() {
        // A thin post hides the centre line but not every sample origin.
        let mut scene = scene_with_spy();
        scene.add(SceneBody::new(ColliderHandle(2), Vec3::new(0.0, 1.5, 1.0), 0.1, WALL_LAYER));
        let origins = line_of_sight_origins(Vec3::new(0.0, 1.5, 0.0), Vec3::new(0.0, 1.5, 10.0), &capsule());
        assert_eq!(origins.len(), 5);
        assert!(has_line_of_sight(
            &scene,
            Vec3::new(0.0, 1.5, 0.0),
            Vec3::new(0.0, 1.5, 10.0),
            SPY,
            &capsule(),
            mask(),
        ));
    }

    #[test]
    fn test_los_ignores_layers_outside_mask() {
        let mut scene = scene_with_spy();
        // Wall on a layer the sight cast does not collide with.
        scene.add(SceneBody::new(ColliderHandle(3), Vec3::new(0.0, 1.5, 5.0), 3.0, 4));
        assert!(has_line_of_sight(
            &scene,
            Vec3::new(0.0, 1.5, 0.0),
            Vec3::new(0.0, 1.5, 10.0),
            SPY,
            &capsule(),
            mask(),
        ));
    }

    #[test]
    fn test_no_hit_is_not_visible() {
        let scene = SphereScene::new();
        assert!(!has_line_of_sight(
            &scene,
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 10.0),
            SPY,
            &capsule(),
            mask(),
        ));
    }

    #[test]
    fn test_origins_for_vertical_sight_line() {
        let origins = line_of_sight_origins(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0), &capsule());
        for origin in origins {
            assert!(origin.is_finite());
        }
        // Lateral samples fall back to the X axis.
        assert!((origins[3] - Vec3::new(0.3, 0.0, 0.0)).length() < 1e-5);
    }
}
