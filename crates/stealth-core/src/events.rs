//! Events emitted by spotters for game logic and debugging feedback.

use serde::{Deserialize, Serialize};

use crate::types::{ColliderHandle, LastSeen};

/// Reaction emitted whenever a spotter fires one of its behavior hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StealthEvent {
    /// A suspicious spy drew the spotter's attention.
    SpyFound {
        spotter: ColliderHandle,
        spy: ColliderHandle,
    },
    /// Investigation ended without recognition.
    SpyLost {
        spotter: ColliderHandle,
        spy: ColliderHandle,
        last_seen: Option<LastSeen>,
    },
    /// The designated target was recognized (or re-acquired while searching).
    TargetFound {
        spotter: ColliderHandle,
        spy: ColliderHandle,
    },
    /// Pursuit broke off; the spotter starts searching.
    TargetLost {
        spotter: ColliderHandle,
        spy: ColliderHandle,
        last_seen: Option<LastSeen>,
    },
    /// The spotter gave up on whatever it was pursuing.
    TargetForgotten { spotter: ColliderHandle },
    /// A recognized non-target spy was put on the ignore list.
    SpyIgnored {
        spotter: ColliderHandle,
        spy: ColliderHandle,
    },
}

impl StealthEvent {
    pub fn spotter(&self) -> ColliderHandle {
        match self {
            StealthEvent::SpyFound { spotter, .. }
            | StealthEvent::SpyLost { spotter, .. }
            | StealthEvent::TargetFound { spotter, .. }
            | StealthEvent::TargetLost { spotter, .. }
            | StealthEvent::TargetForgotten { spotter }
            | StealthEvent::SpyIgnored { spotter, .. } => *spotter,
        }
    }
}

/// An event stamped with the stealth tick during which it occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickedEvent {
    pub tick: u64,
    #[serde(flatten)]
    pub event: StealthEvent,
}
