//! Registry of spotters and cover props plus the global stealth clock.
//!
//! The trigger system only knows collider handles; the manager maps them
//! back to ECS entities. It also accumulates host frame deltas and fires
//! a stealth tick once per `1 / tick_frequency` seconds, independently of
//! the host frame rate.

use std::collections::BTreeMap;

use hecs::Entity;
use tracing::{trace, warn};

use stealth_core::config::{ConfigError, StealthConfig};
use stealth_core::types::ColliderHandle;

#[derive(Debug)]
pub struct StealthManager {
    spotters: BTreeMap<ColliderHandle, Entity>,
    props: BTreeMap<ColliderHandle, Entity>,
    tick_interval_secs: f32,
    accumulator: f32,
}

impl StealthManager {
    /// Create a manager ticking at `config.tick_frequency`.
    pub fn new(config: &StealthConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            spotters: BTreeMap::new(),
            props: BTreeMap::new(),
            tick_interval_secs: config.tick_interval_secs(),
            accumulator: 0.0,
        })
    }

    /// Register a spotter. A handle that is already registered keeps its
    /// original entity.
    pub fn register_spotter(&mut self, handle: ColliderHandle, entity: Entity) {
        if self.spotters.contains_key(&handle) {
            warn!(handle = %handle, "spotter already registered");
            return;
        }
        self.spotters.insert(handle, entity);
    }

    pub fn unregister_spotter(&mut self, handle: ColliderHandle) -> Option<Entity> {
        self.spotters.remove(&handle)
    }

    /// Register a cover prop. Duplicate registration is ignored.
    pub fn register_prop(&mut self, handle: ColliderHandle, entity: Entity) {
        if self.props.contains_key(&handle) {
            warn!(handle = %handle, "prop already registered");
            return;
        }
        self.props.insert(handle, entity);
    }

    pub fn unregister_prop(&mut self, handle: ColliderHandle) -> Option<Entity> {
        self.props.remove(&handle)
    }

    pub fn spotter(&self, handle: ColliderHandle) -> Option<Entity> {
        self.spotters.get(&handle).copied()
    }

    pub fn prop(&self, handle: ColliderHandle) -> Option<Entity> {
        self.props.get(&handle).copied()
    }

    pub fn spotter_count(&self) -> usize {
        self.spotters.len()
    }

    pub fn prop_count(&self) -> usize {
        self.props.len()
    }

    /// Copy of the registered spotters in ascending handle order, taken
    /// before a tick fan-out so the registry can change underneath it.
    pub fn spotter_handles(&self) -> Vec<(ColliderHandle, Entity)> {
        self.spotters.iter().map(|(h, e)| (*h, *e)).collect()
    }

    pub fn tick_interval_secs(&self) -> f32 {
        self.tick_interval_secs
    }

    /// Stealth time accumulated toward the next tick.
    pub fn pending_secs(&self) -> f32 {
        self.accumulator
    }

    /// Feed one host frame. Returns the accumulated stealth delta when a
    /// tick is due, resetting the accumulator.
    pub fn advance(&mut self, dt: f32) -> Option<f32> {
        if !(dt.is_finite() && dt > 0.0) {
            return None;
        }
        self.accumulator += dt;
        if self.accumulator < self.tick_interval_secs {
            return None;
        }
        let delta = std::mem::take(&mut self.accumulator);
        trace!(delta, spotters = self.spotters.len(), "stealth tick");
        Some(delta)
    }
}
