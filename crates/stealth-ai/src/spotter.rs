//! Spotter perception state machine.
//!
//! Spies push their ratings into the spotter as they change (see the
//! `on_*` notification methods); the global stealth tick then drives the
//! state machine, which re-reads the latest ratings and verifies them
//! geometrically through [`Senses`]. Each state runs only once every N
//! stealth ticks, N being that state's configured interval, so expensive
//! states can be throttled independently of cheap ones.
//!
//! Transitions:
//!
//! ```text
//! Patrolling    --suspicious spy-------------> Investigating
//! Investigating --lost-----------------------> Patrolling
//! Investigating --recognized, is target------> Following
//! Investigating --recognized, not target-----> Patrolling (spy ignored)
//! Following     --lost-----------------------> Searching
//! Searching     --sight regained-------------> Following
//! Searching     --search timed out-----------> Patrolling
//! any           --loud enough----------------> Investigating
//! ```

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use stealth_core::config::{ConfigError, SpotterConfig};
use stealth_core::enums::SpotterState;
use stealth_core::events::StealthEvent;
use stealth_core::types::{ColliderHandle, LastSeen};
use stealth_geometry::{falloff, in_field_of_view};

use crate::behavior::SpotterBehavior;
use crate::ignore::IgnoreList;
use crate::senses::Senses;

/// An observing agent.
pub struct Spotter {
    handle: ColliderHandle,
    config: SpotterConfig,
    state: SpotterState,
    /// Spies inside visibility range and their latest published rating.
    visible: BTreeMap<ColliderHandle, f32>,
    /// Spies inside audibility range and their latest published rating.
    audible: BTreeMap<ColliderHandle, f32>,
    spy_in_question: Option<ColliderHandle>,
    last_seen: Option<LastSeen>,
    /// Stealth ticks since the current state's body last ran.
    tick_counter: u32,
    /// Stealth time accumulated across throttled ticks.
    pending_secs: f32,
    search_remaining_secs: f32,
    target: Option<ColliderHandle>,
    ignored: IgnoreList,
    /// Ratings of ignored spies still inside visibility range, restored
    /// to `visible` when the ignore entry lapses.
    ignored_visible: BTreeMap<ColliderHandle, f32>,
    pending_removals: Vec<ColliderHandle>,
    behavior: Box<dyn SpotterBehavior>,
    outbox: Vec<StealthEvent>,
}

impl std::fmt::Debug for Spotter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spotter")
            .field("handle", &self.handle)
            .field("state", &self.state)
            .field("spy_in_question", &self.spy_in_question)
            .field("target", &self.target)
            .field("visible", &self.visible)
            .field("audible", &self.audible)
            .field("ignored", &self.ignored.len())
            .finish_non_exhaustive()
    }
}

impl Spotter {
    /// Create a patrolling spotter. Fails if the config would make the
    /// tick math meaningless (zero intervals, inverted ranges, ...).
    pub fn new(
        handle: ColliderHandle,
        config: SpotterConfig,
        behavior: Box<dyn SpotterBehavior>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            handle,
            ignored: IgnoreList::new(config.ignore_retention),
            ignored_visible: BTreeMap::new(),
            config,
            state: SpotterState::Patrolling,
            visible: BTreeMap::new(),
            audible: BTreeMap::new(),
            spy_in_question: None,
            last_seen: None,
            tick_counter: 0,
            pending_secs: 0.0,
            search_remaining_secs: 0.0,
            target: None,
            pending_removals: Vec::new(),
            behavior,
            outbox: Vec::new(),
        })
    }

    pub fn handle(&self) -> ColliderHandle {
        self.handle
    }

    pub fn config(&self) -> &SpotterConfig {
        &self.config
    }

    pub fn state(&self) -> SpotterState {
        self.state
    }

    /// The spy being investigated or followed. `None` in other states.
    pub fn pursued_spy(&self) -> Option<ColliderHandle> {
        if self.state.is_pursuing() {
            self.spy_in_question
        } else {
            None
        }
    }

    /// Where the last lost spy was seen. Only meaningful while patrolling
    /// or searching; `None` while pursuing.
    pub fn last_seen(&self) -> Option<LastSeen> {
        if self.state.is_pursuing() {
            None
        } else {
            self.last_seen
        }
    }

    pub fn target(&self) -> Option<ColliderHandle> {
        self.target
    }

    /// Designate the spy this spotter is hunting.
    pub fn set_target(&mut self, target: Option<ColliderHandle>) {
        self.target = target;
    }

    pub fn is_ignoring(&self, spy: ColliderHandle) -> bool {
        self.ignored.contains(spy)
    }

    pub fn ignored_count(&self) -> usize {
        self.ignored.len()
    }

    pub fn visibility_rating(&self, spy: ColliderHandle) -> Option<f32> {
        self.visible.get(&spy).copied()
    }

    pub fn audibility_rating(&self, spy: ColliderHandle) -> Option<f32> {
        self.audible.get(&spy).copied()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn audible_count(&self) -> usize {
        self.audible.len()
    }

    pub fn search_remaining_secs(&self) -> f32 {
        self.search_remaining_secs
    }

    /// Take the events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<StealthEvent> {
        std::mem::take(&mut self.outbox)
    }

    // --- Notifications pushed by spies ---

    pub fn on_spy_visible(&mut self, spy: ColliderHandle) {
        if self.ignored.contains(spy) {
            self.ignored_visible.entry(spy).or_insert(0.0);
            return;
        }
        self.visible.entry(spy).or_insert(0.0);
    }

    pub fn on_spy_invisible(&mut self, spy: ColliderHandle) {
        self.visible.remove(&spy);
        self.ignored_visible.remove(&spy);
    }

    pub fn on_visibility_change(&mut self, spy: ColliderHandle, rating: f32) {
        if self.ignored.contains(spy) {
            self.ignored_visible.insert(spy, rating);
            return;
        }
        self.visible.insert(spy, rating);
    }

    pub fn on_spy_audible(&mut self, spy: ColliderHandle) {
        self.audible.entry(spy).or_insert(0.0);
    }

    pub fn on_spy_inaudible(&mut self, spy: ColliderHandle) {
        self.audible.remove(&spy);
    }

    /// Record a new audibility rating. A rating above the investigation
    /// threshold interrupts the current state immediately, bypassing the
    /// tick throttle: sound cannot be hidden by cover.
    pub fn on_audibility_change(&mut self, spy: ColliderHandle, rating: f32) {
        self.audible.insert(spy, rating);

        if rating <= self.config.investigate_audibility
            || self.ignored.contains(spy)
            || self.state == SpotterState::Investigating
        {
            return;
        }
        debug!(spotter = %self.handle, spy = %spy, from = ?self.state, "heard spy");
        self.begin_investigation(spy);
    }

    /// Drop every trace of a spy that no longer exists, so a new spy on
    /// the same handle starts from a clean slate. A pursuit of the spy ends
    /// on the spot, without a last-seen position.
    pub fn forget_spy(&mut self, spy: ColliderHandle) {
        self.visible.remove(&spy);
        self.audible.remove(&spy);
        self.ignored_visible.remove(&spy);
        self.ignored.remove(spy);
        self.pending_removals.retain(|s| *s != spy);

        if self.spy_in_question != Some(spy) {
            return;
        }
        let previous = self.state;
        self.spy_in_question = None;
        self.last_seen = None;
        self.search_remaining_secs = 0.0;
        self.tick_counter = 0;
        self.pending_secs = 0.0;
        self.set_state(SpotterState::Patrolling);
        match previous {
            SpotterState::Investigating => self.react(StealthEvent::SpyLost {
                spotter: self.handle,
                spy,
                last_seen: None,
            }),
            SpotterState::Following | SpotterState::Searching => {
                self.react(StealthEvent::TargetForgotten {
                    spotter: self.handle,
                })
            }
            SpotterState::Patrolling => {}
        }
    }

    // --- Tick ---

    /// Advance by one stealth tick of `dt` seconds.
    pub fn on_stealth_tick(&mut self, dt: f32, senses: &dyn Senses) {
        for spy in self.ignored.advance(dt) {
            trace!(spotter = %self.handle, spy = %spy, "ignore entry expired");
            self.unignore(spy);
        }

        self.tick_counter += 1;
        self.pending_secs += dt;
        if self.tick_counter < self.config.intervals.for_state(self.state) {
            return;
        }
        self.tick_counter = 0;
        let elapsed = std::mem::take(&mut self.pending_secs);

        match self.state {
            SpotterState::Patrolling => self.patrol(senses),
            SpotterState::Investigating => self.investigate(senses),
            SpotterState::Following => self.follow(senses),
            SpotterState::Searching => self.search(elapsed, senses),
        }

        for spy in self.pending_removals.drain(..) {
            if let Some(rating) = self.visible.remove(&spy) {
                self.ignored_visible.insert(spy, rating);
            }
        }
    }

    fn patrol(&mut self, senses: &dyn Senses) {
        let perceived: BTreeSet<ColliderHandle> =
            self.visible.keys().chain(self.audible.keys()).copied().collect();
        let suspect = perceived
            .into_iter()
            .find(|spy| self.should_investigate(*spy, senses));
        if let Some(spy) = suspect {
            self.begin_investigation(spy);
        }
    }

    fn investigate(&mut self, senses: &dyn Senses) {
        let Some(spy) = self.spy_in_question else {
            self.set_state(SpotterState::Patrolling);
            return;
        };

        if !self.should_keep_investigating(spy, senses) {
            self.remember_last_seen(spy, senses);
            self.spy_in_question = None;
            self.set_state(SpotterState::Patrolling);
            self.react(StealthEvent::SpyLost {
                spotter: self.handle,
                spy,
                last_seen: self.last_seen,
            });
            return;
        }

        if self.effective_visibility(spy, senses) <= self.config.recognize_visibility {
            return;
        }

        if self.target == Some(spy) {
            self.set_state(SpotterState::Following);
            self.react(StealthEvent::TargetFound {
                spotter: self.handle,
                spy,
            });
        } else {
            self.spy_in_question = None;
            self.set_state(SpotterState::Patrolling);
            self.react(StealthEvent::TargetForgotten {
                spotter: self.handle,
            });
            if let Some(evicted) = self.ignored.insert(spy) {
                trace!(spotter = %self.handle, spy = %evicted, "ignore entry evicted");
                self.unignore(evicted);
            }
            self.pending_removals.push(spy);
            self.react(StealthEvent::SpyIgnored {
                spotter: self.handle,
                spy,
            });
        }
    }

    fn follow(&mut self, senses: &dyn Senses) {
        let Some(spy) = self.spy_in_question else {
            self.set_state(SpotterState::Patrolling);
            return;
        };

        if !self.should_keep_investigating(spy, senses) {
            self.remember_last_seen(spy, senses);
            self.search_remaining_secs = self.config.search_duration_secs;
            self.set_state(SpotterState::Searching);
            self.react(StealthEvent::TargetLost {
                spotter: self.handle,
                spy,
                last_seen: self.last_seen,
            });
        }
    }

    fn search(&mut self, elapsed: f32, senses: &dyn Senses) {
        let Some(spy) = self.spy_in_question else {
            self.set_state(SpotterState::Patrolling);
            return;
        };

        self.search_remaining_secs -= elapsed;

        if senses.line_of_sight(spy) && self.effective_visibility(spy, senses) > 0.0 {
            self.set_state(SpotterState::Following);
            self.react(StealthEvent::TargetFound {
                spotter: self.handle,
                spy,
            });
            return;
        }

        if self.search_remaining_secs <= 0.0 {
            self.search_remaining_secs = 0.0;
            self.spy_in_question = None;
            self.set_state(SpotterState::Patrolling);
            self.react(StealthEvent::TargetForgotten {
                spotter: self.handle,
            });
        }
    }

    // --- Perception checks ---

    /// Visibility of `spy` after distance falloff, in [0, 1].
    /// Zero for spies outside visibility range.
    pub fn effective_visibility(&self, spy: ColliderHandle, senses: &dyn Senses) -> f32 {
        let Some(&rating) = self.visible.get(&spy) else {
            return 0.0;
        };
        let Some(spy_pose) = senses.spy_pose(spy) else {
            return 0.0;
        };
        let distance_sq = senses.spotter_pose().distance_squared(&spy_pose);
        falloff::effective_visibility(
            rating,
            distance_sq,
            self.config.min_vision_distance,
            self.config.max_vision_distance,
        )
    }

    fn is_loud(&self, spy: ColliderHandle) -> bool {
        self.audible
            .get(&spy)
            .is_some_and(|&rating| rating > self.config.investigate_audibility)
    }

    fn in_view(&self, spy: ColliderHandle, senses: &dyn Senses) -> bool {
        let Some(spy_pose) = senses.spy_pose(spy) else {
            return false;
        };
        let own = senses.spotter_pose();
        in_field_of_view(
            own.forward,
            spy_pose.position - own.position,
            self.config.fov_degrees,
        )
    }

    /// Whether a perceived spy is suspicious enough to investigate.
    pub fn should_investigate(&self, spy: ColliderHandle, senses: &dyn Senses) -> bool {
        if self.ignored.contains(spy) {
            return false;
        }
        if self.is_loud(spy) {
            return true;
        }
        self.visible.contains_key(&spy)
            && self.in_view(spy, senses)
            && senses.line_of_sight(spy)
            && self.effective_visibility(spy, senses) > self.config.investigate_visibility
    }

    /// Whether the spy under investigation is still perceived at all.
    pub fn should_keep_investigating(&self, spy: ColliderHandle, senses: &dyn Senses) -> bool {
        if self.is_loud(spy) {
            return true;
        }
        self.visible.contains_key(&spy) && senses.line_of_sight(spy)
    }

    // --- Transitions ---

    fn begin_investigation(&mut self, spy: ColliderHandle) {
        self.spy_in_question = Some(spy);
        self.tick_counter = 0;
        self.pending_secs = 0.0;
        self.set_state(SpotterState::Investigating);
        self.react(StealthEvent::SpyFound {
            spotter: self.handle,
            spy,
        });
    }

    /// A lapsed ignore entry: a spy still in range becomes visible again at
    /// its last published rating.
    fn unignore(&mut self, spy: ColliderHandle) {
        if let Some(rating) = self.ignored_visible.remove(&spy) {
            self.visible.insert(spy, rating);
        }
    }

    fn remember_last_seen(&mut self, spy: ColliderHandle, senses: &dyn Senses) {
        if let Some(pose) = senses.spy_pose(spy) {
            self.last_seen = Some(pose.into());
        }
    }

    fn set_state(&mut self, next: SpotterState) {
        if self.state != next {
            debug!(
                spotter = %self.handle,
                spy = ?self.spy_in_question,
                from = ?self.state,
                to = ?next,
                "spotter transition"
            );
            self.state = next;
        }
    }

    /// Fire the matching behavior hook and record the event.
    fn react(&mut self, event: StealthEvent) {
        match &event {
            StealthEvent::SpyFound { spy, .. } => self.behavior.on_spy_found(*spy),
            StealthEvent::SpyLost { spy, last_seen, .. } => {
                self.behavior.on_spy_lost(*spy, *last_seen)
            }
            StealthEvent::TargetFound { spy, .. } => self.behavior.on_target_found(*spy),
            StealthEvent::TargetLost { spy, last_seen, .. } => {
                self.behavior.on_target_lost(*spy, *last_seen)
            }
            StealthEvent::TargetForgotten { .. } => self.behavior.forget_target(),
            StealthEvent::SpyIgnored { .. } => {}
        }
        self.outbox.push(event);
    }
}
