//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Spotter behavior state. There is no terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpotterState {
    /// Routine watch; scanning perceived spies for anything suspicious.
    #[default]
    Patrolling,
    /// A suspicious spy is being examined until recognized or lost.
    Investigating,
    /// The designated target has been recognized and is being pursued.
    Following,
    /// The target was lost; sweeping the last known position until timeout.
    Searching,
}

impl SpotterState {
    pub const ALL: [SpotterState; 4] = [
        SpotterState::Patrolling,
        SpotterState::Investigating,
        SpotterState::Following,
        SpotterState::Searching,
    ];

    /// States in which a spy is actively pursued.
    pub fn is_pursuing(self) -> bool {
        matches!(self, SpotterState::Investigating | SpotterState::Following)
    }
}

/// Overlap transition reported by the trigger system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerPhase {
    Enter,
    Exit,
}

/// Which of a spy's volumes took part in an overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TriggerVolume {
    /// The spy's own body against a cover prop.
    SpyBody,
    /// The spy's visibility-range probe against a spotter.
    VisionProbe,
    /// The spy's audibility-range probe against a spotter.
    HearingProbe,
}

/// The sense through which a spotter perceives a spy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sense {
    Sight,
    Hearing,
}

impl TriggerVolume {
    /// The sense a probe volume feeds. The spy body feeds none.
    pub fn sense(self) -> Option<Sense> {
        match self {
            TriggerVolume::SpyBody => None,
            TriggerVolume::VisionProbe => Some(Sense::Sight),
            TriggerVolume::HearingProbe => Some(Sense::Hearing),
        }
    }
}
