//! Simulation snapshot: the observable state of every spotter and spy.

use serde::{Deserialize, Serialize};

use crate::enums::SpotterState;
use crate::events::TickedEvent;
use crate::types::{ColliderHandle, LastSeen, Pose};

/// Complete stealth state, suitable for debug overlays and replays.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StealthSnapshot {
    /// Number of stealth ticks dispatched so far.
    pub tick: u64,
    /// Stealth time dispatched so far (seconds).
    pub elapsed_secs: f64,
    pub spotters: Vec<SpotterView>,
    pub spies: Vec<SpyView>,
    /// Events produced since the previous snapshot was taken.
    pub events: Vec<TickedEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotterView {
    pub handle: ColliderHandle,
    pub pose: Pose,
    pub state: SpotterState,
    pub pursued_spy: Option<ColliderHandle>,
    pub target: Option<ColliderHandle>,
    pub last_seen: Option<LastSeen>,
    pub visible_spies: usize,
    pub audible_spies: usize,
    pub ignored_spies: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpyView {
    pub handle: ColliderHandle,
    pub pose: Pose,
    pub visibility: f32,
    pub audibility: f32,
    pub hidden: bool,
    pub cover: Option<ColliderHandle>,
    pub watched_by_sight: usize,
    pub watched_by_hearing: usize,
    pub vision_probe_radius: f32,
    pub hearing_probe_radius: f32,
}
