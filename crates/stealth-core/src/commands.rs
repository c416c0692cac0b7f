//! Commands sent from the host to the stealth simulation.
//!
//! Commands are queued and processed at the start of the next update, so
//! a behavior hook running inside a tick can request changes without
//! touching the registries being iterated.

use serde::{Deserialize, Serialize};

use crate::enums::{TriggerPhase, TriggerVolume};
use crate::types::{ColliderHandle, Pose};

/// An overlap reported by the trigger system.
///
/// `other` is the prop for [`TriggerVolume::SpyBody`] and the spotter for
/// either probe volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEvent {
    pub phase: TriggerPhase,
    pub volume: TriggerVolume,
    pub spy: ColliderHandle,
    pub other: ColliderHandle,
}

impl TriggerEvent {
    pub fn enter(volume: TriggerVolume, spy: ColliderHandle, other: ColliderHandle) -> Self {
        Self {
            phase: TriggerPhase::Enter,
            volume,
            spy,
            other,
        }
    }

    pub fn exit(volume: TriggerVolume, spy: ColliderHandle, other: ColliderHandle) -> Self {
        Self {
            phase: TriggerPhase::Exit,
            volume,
            spy,
            other,
        }
    }
}

/// All deferred host actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StealthCommand {
    /// Move any actor.
    SetPose { handle: ColliderHandle, pose: Pose },
    SetVisibilityRating { spy: ColliderHandle, rating: f32 },
    SetAudibilityRating { spy: ColliderHandle, rating: f32 },
    /// Designate (or clear) the spy a spotter hunts.
    SetTarget {
        spotter: ColliderHandle,
        target: Option<ColliderHandle>,
    },
    /// Deliver a trigger overlap.
    Trigger(TriggerEvent),
    /// Remove an actor and notify its counterparts.
    Despawn { handle: ColliderHandle },
}
