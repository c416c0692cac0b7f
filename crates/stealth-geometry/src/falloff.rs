//! Visibility falloff over distance.
//!
//! Visibility decays linearly in *squared* distance between a minimum
//! range (no decay) and a maximum range (full decay). A spy's own rating
//! divides the decay, so a brighter spy stays noticeable further out.

/// Position of `value` between `a` and `b`, clamped to [0, 1].
/// Returns 0 when the range is empty.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() < f32::EPSILON {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Effective visibility of a spy with `rating` at squared distance
/// `distance_sq`: `clamp01(1 - inverse_lerp(min², max², d²) / rating)`.
///
/// Always in [0, 1]. A non-positive rating means the spy cannot be seen.
pub fn effective_visibility(rating: f32, distance_sq: f32, min_distance: f32, max_distance: f32) -> f32 {
    if !(rating > 0.0) {
        return 0.0;
    }
    let decay = inverse_lerp(
        min_distance * min_distance,
        max_distance * max_distance,
        distance_sq,
    );
    (1.0 - decay / rating).clamp(0.0, 1.0)
}
