//! Cover props.

use serde::{Deserialize, Serialize};

use stealth_core::constants::DEFAULT_PROP_RADIUS;

use crate::error::SimError;

/// An object a spy can hide in. Scales the hidden spy's visibility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StealthProp {
    multiplier: f32,
    /// Overlap radius used by the built-in proximity triggers.
    radius: f32,
}

impl StealthProp {
    pub fn new(multiplier: f32, radius: f32) -> Result<Self, SimError> {
        if !(multiplier > 0.0 && multiplier <= 1.0) {
            return Err(SimError::InvalidMultiplier(multiplier));
        }
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(SimError::InvalidRadius(radius));
        }
        Ok(Self { multiplier, radius })
    }

    /// Prop with the default overlap radius.
    pub fn with_multiplier(multiplier: f32) -> Result<Self, SimError> {
        Self::new(multiplier, DEFAULT_PROP_RADIUS)
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}
