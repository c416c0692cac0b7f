//! Spy perception bookkeeping.
//!
//! A spy publishes how visible and how audible it currently is to every
//! spotter whose range it is inside. The logic here is pure: each
//! operation updates the spy and returns the notices the engine must
//! deliver, so it never needs access to the spotters themselves.

use std::collections::BTreeSet;

use stealth_core::constants::{BASELINE_AUDIBILITY, BASELINE_VISIBILITY};
use stealth_core::types::ColliderHandle;

/// What a spotter is told about a spy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notice {
    Visible,
    Invisible,
    VisibilityChange(f32),
    Audible,
    Inaudible,
    AudibilityChange(f32),
}

/// A notice addressed to one spotter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpyNotice {
    pub spotter: ColliderHandle,
    pub notice: Notice,
}

impl SpyNotice {
    fn new(spotter: ColliderHandle, notice: Notice) -> Self {
        Self { spotter, notice }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cover {
    prop: ColliderHandle,
    multiplier: f32,
}

#[derive(Debug, Clone)]
pub struct Spy {
    handle: ColliderHandle,
    base_visibility: f32,
    visibility: f32,
    audibility: f32,
    cover: Option<Cover>,
    watched_by_sight: BTreeSet<ColliderHandle>,
    watched_by_hearing: BTreeSet<ColliderHandle>,
}

impl Spy {
    pub fn new(handle: ColliderHandle) -> Self {
        Self {
            handle,
            base_visibility: BASELINE_VISIBILITY,
            visibility: BASELINE_VISIBILITY,
            audibility: BASELINE_AUDIBILITY,
            cover: None,
            watched_by_sight: BTreeSet::new(),
            watched_by_hearing: BTreeSet::new(),
        }
    }

    pub fn handle(&self) -> ColliderHandle {
        self.handle
    }

    /// Current visibility rating, cover included.
    pub fn visibility(&self) -> f32 {
        self.visibility
    }

    pub fn base_visibility(&self) -> f32 {
        self.base_visibility
    }

    pub fn audibility(&self) -> f32 {
        self.audibility
    }

    pub fn is_hidden(&self) -> bool {
        self.cover.is_some()
    }

    /// The prop the spy is hiding in.
    pub fn cover(&self) -> Option<ColliderHandle> {
        self.cover.map(|c| c.prop)
    }

    pub fn watched_by_sight(&self) -> impl Iterator<Item = ColliderHandle> + '_ {
        self.watched_by_sight.iter().copied()
    }

    pub fn watched_by_hearing(&self) -> impl Iterator<Item = ColliderHandle> + '_ {
        self.watched_by_hearing.iter().copied()
    }

    pub fn is_seen_by(&self, spotter: ColliderHandle) -> bool {
        self.watched_by_sight.contains(&spotter)
    }

    pub fn is_heard_by(&self, spotter: ColliderHandle) -> bool {
        self.watched_by_hearing.contains(&spotter)
    }

    pub fn sight_watchers(&self) -> usize {
        self.watched_by_sight.len()
    }

    pub fn hearing_watchers(&self) -> usize {
        self.watched_by_hearing.len()
    }

    /// Radius the host should give the visibility probe.
    pub fn vision_probe_radius(&self, max_vision_distance: f32) -> f32 {
        max_vision_distance * self.visibility
    }

    /// Radius the host should give the audibility probe.
    pub fn hearing_probe_radius(&self, max_hearing_distance: f32) -> f32 {
        max_hearing_distance * self.audibility
    }

    // --- Cover ---

    /// Hide inside `prop`. Returns false if already hidden. Becoming less
    /// visible is not broadcast; spotters keep the last, higher rating
    /// until the spy shows itself again.
    pub fn enter_cover(&mut self, prop: ColliderHandle, multiplier: f32) -> bool {
        if self.cover.is_some() {
            return false;
        }
        self.cover = Some(Cover { prop, multiplier });
        self.visibility = self.base_visibility * multiplier;
        true
    }

    /// Leave `prop`. Ignored unless it is the current cover.
    pub fn exit_cover(&mut self, prop: ColliderHandle) -> Vec<SpyNotice> {
        if self.cover.map(|c| c.prop) != Some(prop) {
            return Vec::new();
        }
        self.cover = None;
        self.visibility = self.base_visibility;
        self.broadcast_visibility()
    }

    // --- Probe overlaps ---

    pub fn enter_vision(&mut self, spotter: ColliderHandle) -> Vec<SpyNotice> {
        if !self.watched_by_sight.insert(spotter) {
            return Vec::new();
        }
        vec![
            SpyNotice::new(spotter, Notice::Visible),
            SpyNotice::new(spotter, Notice::VisibilityChange(self.visibility)),
        ]
    }

    pub fn exit_vision(&mut self, spotter: ColliderHandle) -> Vec<SpyNotice> {
        if !self.watched_by_sight.remove(&spotter) {
            return Vec::new();
        }
        vec![SpyNotice::new(spotter, Notice::Invisible)]
    }

    pub fn enter_hearing(&mut self, spotter: ColliderHandle) -> Vec<SpyNotice> {
        if !self.watched_by_hearing.insert(spotter) {
            return Vec::new();
        }
        vec![
            SpyNotice::new(spotter, Notice::Audible),
            SpyNotice::new(spotter, Notice::AudibilityChange(self.audibility)),
        ]
    }

    pub fn exit_hearing(&mut self, spotter: ColliderHandle) -> Vec<SpyNotice> {
        if !self.watched_by_hearing.remove(&spotter) {
            return Vec::new();
        }
        vec![SpyNotice::new(spotter, Notice::Inaudible)]
    }

    /// Drop a spotter that left the simulation. Nothing to notify.
    pub fn forget_spotter(&mut self, spotter: ColliderHandle) {
        self.watched_by_sight.remove(&spotter);
        self.watched_by_hearing.remove(&spotter);
    }

    // --- Ratings ---

    /// Replace the uncovered visibility rating. Spotters only hear about
    /// it if the effective rating went up.
    pub fn set_visibility_rating(&mut self, rating: f32) -> Vec<SpyNotice> {
        let previous = self.visibility;
        self.base_visibility = rating;
        self.visibility = match self.cover {
            Some(cover) => rating * cover.multiplier,
            None => rating,
        };
        if self.visibility > previous {
            self.broadcast_visibility()
        } else {
            Vec::new()
        }
    }

    /// Replace the audibility rating. Cover does not muffle sound.
    pub fn set_audibility_rating(&mut self, rating: f32) -> Vec<SpyNotice> {
        let previous = self.audibility;
        self.audibility = rating;
        if rating > previous {
            self.watched_by_hearing
                .iter()
                .map(|s| SpyNotice::new(*s, Notice::AudibilityChange(rating)))
                .collect()
        } else {
            Vec::new()
        }
    }

    fn broadcast_visibility(&self) -> Vec<SpyNotice> {
        self.watched_by_sight
            .iter()
            .map(|s| SpyNotice::new(*s, Notice::VisibilityChange(self.visibility)))
            .collect()
    }
}
