//! Configuration structures for the stealth simulation.
//!
//! All tuning is author-time numeric data. Every struct derives serde with
//! `#[serde(default)]` so a partial JSON document only overrides what it
//! names. Configuration is validated once, at load or construction time,
//! so the tick math never has to guard against zero frequencies or
//! intervals.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::SpotterState;
use crate::types::{Capsule, LayerMask};

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse JSON content.
    #[error("failed to parse config JSON: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// A value is outside its permitted range.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Global settings shared by every spotter and spy in one simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StealthConfig {
    /// Stealth ticks per second.
    pub tick_frequency: f32,
    /// Layers that sight casts collide with.
    pub obstruction_mask: LayerMask,
    /// Layers the spy probes overlap. Read by hosts that build the probe
    /// trigger volumes in their own physics; the built-in proximity
    /// triggers go by distance and ignore it.
    pub spotter_mask: LayerMask,
    /// Reference body used to size line-of-sight casts.
    pub spy_capsule: Capsule,
    /// Vision probe radius for a spy with visibility rating 1.0.
    pub max_vision_distance: f32,
    /// Hearing probe radius for a spy with audibility rating 1.0.
    pub max_hearing_distance: f32,
    /// Compute trigger overlaps by distance instead of waiting for an
    /// external collision system.
    pub proximity_triggers: bool,
    /// Defaults applied to spotters spawned without their own config.
    pub spotter: SpotterConfig,
}

impl Default for StealthConfig {
    fn default() -> Self {
        Self {
            tick_frequency: DEFAULT_TICK_FREQUENCY,
            obstruction_mask: DEFAULT_OBSTRUCTION_MASK,
            spotter_mask: DEFAULT_SPOTTER_MASK,
            spy_capsule: Capsule::new(DEFAULT_CAPSULE_RADIUS, DEFAULT_CAPSULE_HEIGHT),
            max_vision_distance: DEFAULT_MAX_VISION_DISTANCE,
            max_hearing_distance: DEFAULT_MAX_HEARING_DISTANCE,
            proximity_triggers: false,
            spotter: SpotterConfig::default(),
        }
    }
}

impl StealthConfig {
    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Seconds between two stealth ticks.
    pub fn tick_interval_secs(&self) -> f32 {
        1.0 / self.tick_frequency
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_frequency.is_finite() && self.tick_frequency > 0.0) {
            return Err(ConfigError::invalid(
                "tick_frequency",
                format!("must be positive and finite, got {}", self.tick_frequency),
            ));
        }
        if !(self.spy_capsule.radius > 0.0 && self.spy_capsule.height >= 2.0 * self.spy_capsule.radius)
        {
            return Err(ConfigError::invalid(
                "spy_capsule",
                "radius must be positive and height at least twice the radius",
            ));
        }
        ensure_positive("max_vision_distance", self.max_vision_distance)?;
        ensure_positive("max_hearing_distance", self.max_hearing_distance)?;
        self.spotter.validate()
    }
}

/// How long a spotter remembers spies it has already judged innocent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum IgnoreRetention {
    /// Never forget.
    #[default]
    Permanent,
    /// Forget after the given number of stealth seconds.
    Expiring { secs: f32 },
    /// Keep at most `capacity` entries; the oldest is evicted first.
    Bounded { capacity: usize },
}

/// Per-state throttling, in stealth ticks between two executions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickIntervals {
    pub patrol: u32,
    pub investigate: u32,
    pub follow: u32,
    pub search: u32,
}

impl Default for TickIntervals {
    fn default() -> Self {
        Self {
            patrol: DEFAULT_PATROL_INTERVAL,
            investigate: DEFAULT_INVESTIGATE_INTERVAL,
            follow: DEFAULT_FOLLOW_INTERVAL,
            search: DEFAULT_SEARCH_INTERVAL,
        }
    }
}

impl TickIntervals {
    /// Every state runs on every stealth tick.
    pub const EVERY_TICK: TickIntervals = TickIntervals {
        patrol: 1,
        investigate: 1,
        follow: 1,
        search: 1,
    };

    pub fn for_state(&self, state: SpotterState) -> u32 {
        match state {
            SpotterState::Patrolling => self.patrol,
            SpotterState::Investigating => self.investigate,
            SpotterState::Following => self.follow,
            SpotterState::Searching => self.search,
        }
    }
}

/// Tuning for one spotter. Immutable once the spotter exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotterConfig {
    /// Full cone angle in degrees; a spy is in view below half of it.
    pub fov_degrees: f32,
    pub investigate_visibility: f32,
    pub recognize_visibility: f32,
    pub investigate_audibility: f32,
    pub intervals: TickIntervals,
    pub search_duration_secs: f32,
    pub min_vision_distance: f32,
    pub max_vision_distance: f32,
    pub ignore_retention: IgnoreRetention,
}

impl Default for SpotterConfig {
    fn default() -> Self {
        Self {
            fov_degrees: DEFAULT_FOV_DEGREES,
            investigate_visibility: DEFAULT_INVESTIGATE_VISIBILITY,
            recognize_visibility: DEFAULT_RECOGNIZE_VISIBILITY,
            investigate_audibility: DEFAULT_INVESTIGATE_AUDIBILITY,
            intervals: TickIntervals::default(),
            search_duration_secs: DEFAULT_SEARCH_DURATION_SECS,
            min_vision_distance: DEFAULT_MIN_VISION_DISTANCE,
            max_vision_distance: DEFAULT_MAX_VISION_DISTANCE,
            ignore_retention: IgnoreRetention::Permanent,
        }
    }
}

impl SpotterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees <= 360.0) {
            return Err(ConfigError::invalid(
                "fov_degrees",
                format!("must be in (0, 360], got {}", self.fov_degrees),
            ));
        }
        ensure_unit("investigate_visibility", self.investigate_visibility)?;
        ensure_unit("recognize_visibility", self.recognize_visibility)?;
        if !self.investigate_audibility.is_finite() || self.investigate_audibility < 0.0 {
            return Err(ConfigError::invalid(
                "investigate_audibility",
                "must be finite and non-negative",
            ));
        }
        let intervals = self.intervals;
        for (field, value) in [
            ("intervals.patrol", intervals.patrol),
            ("intervals.investigate", intervals.investigate),
            ("intervals.follow", intervals.follow),
            ("intervals.search", intervals.search),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be at least 1"));
            }
        }
        if !self.search_duration_secs.is_finite() || self.search_duration_secs < 0.0 {
            return Err(ConfigError::invalid(
                "search_duration_secs",
                "must be finite and non-negative",
            ));
        }
        if !(self.min_vision_distance >= 0.0 && self.min_vision_distance < self.max_vision_distance)
        {
            return Err(ConfigError::invalid(
                "min_vision_distance",
                format!(
                    "must be non-negative and below max_vision_distance ({} >= {})",
                    self.min_vision_distance, self.max_vision_distance
                ),
            ));
        }
        match self.ignore_retention {
            IgnoreRetention::Expiring { secs } if !(secs.is_finite() && secs > 0.0) => Err(
                ConfigError::invalid("ignore_retention.secs", "must be positive and finite"),
            ),
            IgnoreRetention::Bounded { capacity: 0 } => Err(ConfigError::invalid(
                "ignore_retention.capacity",
                "must be at least 1",
            )),
            _ => Ok(()),
        }
    }
}

fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {value}")))
    }
}

fn ensure_unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be in [0, 1], got {value}")))
    }
}
