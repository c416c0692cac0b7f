//! Simulation constants and tuning defaults.

use crate::types::LayerMask;

/// Default stealth tick frequency (Hz). Independent of the host frame rate.
pub const DEFAULT_TICK_FREQUENCY: f32 = 10.0;

// --- Vision ---

/// Full field-of-view cone angle in degrees.
pub const DEFAULT_FOV_DEGREES: f32 = 110.0;

/// Distance inside which visibility does not decay (meters).
pub const DEFAULT_MIN_VISION_DISTANCE: f32 = 2.0;

/// Distance at which visibility has fully decayed (meters).
/// Also the vision probe radius for a spy with rating 1.0.
pub const DEFAULT_MAX_VISION_DISTANCE: f32 = 20.0;

/// Hearing probe radius for a spy with audibility rating 1.0 (meters).
pub const DEFAULT_MAX_HEARING_DISTANCE: f32 = 12.0;

// --- Thresholds ---

/// Effective visibility above which a spotter starts investigating.
pub const DEFAULT_INVESTIGATE_VISIBILITY: f32 = 0.5;

/// Effective visibility above which an investigated spy is recognized.
pub const DEFAULT_RECOGNIZE_VISIBILITY: f32 = 0.8;

/// Audibility above which a spy is investigated regardless of sight.
pub const DEFAULT_INVESTIGATE_AUDIBILITY: f32 = 0.5;

// --- Tick intervals (in stealth ticks) ---

pub const DEFAULT_PATROL_INTERVAL: u32 = 3;
pub const DEFAULT_INVESTIGATE_INTERVAL: u32 = 2;
pub const DEFAULT_FOLLOW_INTERVAL: u32 = 1;
pub const DEFAULT_SEARCH_INTERVAL: u32 = 2;

/// Seconds a spotter keeps searching before giving up.
pub const DEFAULT_SEARCH_DURATION_SECS: f32 = 8.0;

// --- Reference body ---

/// Radius of the reference spy capsule (meters).
pub const DEFAULT_CAPSULE_RADIUS: f32 = 0.3;

/// Height of the reference spy capsule (meters).
pub const DEFAULT_CAPSULE_HEIGHT: f32 = 1.8;

/// Number of capsule casts used to approximate a body silhouette.
pub const LOS_SAMPLE_COUNT: usize = 5;

// --- Layers ---

/// Layer of level geometry that blocks sight.
pub const OBSTRUCTION_LAYER: u8 = 0;

/// Layer of spy bodies (hit by sight casts).
pub const SPY_LAYER: u8 = 8;

/// Layer of spotter colliders (overlapped by spy probes).
pub const SPOTTER_LAYER: u8 = 9;

/// Everything a sight cast can hit: level geometry and spies.
pub const DEFAULT_OBSTRUCTION_MASK: LayerMask =
    LayerMask::layer(OBSTRUCTION_LAYER).union(LayerMask::layer(SPY_LAYER));

pub const DEFAULT_SPOTTER_MASK: LayerMask = LayerMask::layer(SPOTTER_LAYER);

// --- Spy baseline ---

pub const BASELINE_VISIBILITY: f32 = 1.0;
pub const BASELINE_AUDIBILITY: f32 = 1.0;

/// Radius used by the built-in proximity system for props without one (meters).
pub const DEFAULT_PROP_RADIUS: f32 = 1.0;
