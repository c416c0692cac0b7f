//! Errors surfaced by the simulation engine.

use stealth_core::config::ConfigError;
use stealth_core::types::ColliderHandle;

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Another spotter, spy or prop already owns this collider.
    #[error("collider {0} is already in use")]
    HandleInUse(ColliderHandle),

    /// No actor of any kind is registered under this collider.
    #[error("no actor registered for collider {0}")]
    UnknownHandle(ColliderHandle),

    #[error("collider {0} is not a spotter")]
    UnknownSpotter(ColliderHandle),

    #[error("collider {0} is not a spy")]
    UnknownSpy(ColliderHandle),

    /// Cover multipliers live in (0, 1].
    #[error("invalid cover multiplier {0}: must be in (0, 1]")]
    InvalidMultiplier(f32),

    #[error("invalid prop radius {0}: must be finite and non-negative")]
    InvalidRadius(f32),

    #[error("invalid rating {0}: must be finite and non-negative")]
    InvalidRating(f32),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
