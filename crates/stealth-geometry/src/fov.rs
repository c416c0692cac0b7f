//! Field-of-view cone test.

use glam::Vec3;

/// Whether `to_target` lies inside a cone of `fov_degrees` (full angle)
/// around `forward`. A target at the observer's own position is in view;
/// an observer without a facing sees nothing.
pub fn in_field_of_view(forward: Vec3, to_target: Vec3, fov_degrees: f32) -> bool {
    if to_target.length_squared() < f32::EPSILON {
        return true;
    }
    if forward.length_squared() < f32::EPSILON {
        return false;
    }
    let half_angle = (fov_degrees * 0.5).to_radians();
    forward.angle_between(to_target) < half_angle
}
