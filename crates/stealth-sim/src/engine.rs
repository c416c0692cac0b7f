//! Stealth engine: the runtime that ties spies, spotters and props together.
//!
//! `StealthEngine` owns the hecs ECS world, routes trigger overlaps and
//! rating changes from spies to spotters, drives the global stealth clock
//! and produces `StealthSnapshot`s. Completely headless: geometry queries go
//! through a [`PhysicsQuery`] supplied by the host.
//!
//! Actors only enter the registries through `spawn_*` and only leave
//! through [`StealthEngine::despawn`], which also notifies every
//! counterpart, so no registration outlives its actor.

use std::collections::{BTreeMap, VecDeque};

use hecs::{Entity, World};
use tracing::{debug, trace, warn};

use stealth_ai::{Spotter, SpotterBehavior};
use stealth_core::commands::{StealthCommand, TriggerEvent};
use stealth_core::config::{SpotterConfig, StealthConfig};
use stealth_core::enums::{TriggerPhase, TriggerVolume};
use stealth_core::events::TickedEvent;
use stealth_core::state::StealthSnapshot;
use stealth_core::types::{ColliderHandle, Pose};
use stealth_geometry::{PhysicsQuery, SphereScene};

use crate::error::SimError;
use crate::manager::StealthManager;
use crate::prop::StealthProp;
use crate::spy::{Notice, Spy, SpyNotice};
use crate::systems;
use crate::systems::proximity::ProximityTracker;

pub struct StealthEngine<P: PhysicsQuery = SphereScene> {
    world: World,
    config: StealthConfig,
    manager: StealthManager,
    physics: P,
    spies: BTreeMap<ColliderHandle, Entity>,
    proximity: ProximityTracker,
    /// Stealth ticks dispatched so far.
    tick: u64,
    elapsed_secs: f64,
    command_queue: VecDeque<StealthCommand>,
    events: Vec<TickedEvent>,
}

impl<P: PhysicsQuery> StealthEngine<P> {
    /// Create an engine. Fails if the configuration does not validate.
    pub fn new(config: StealthConfig, physics: P) -> Result<Self, SimError> {
        let manager = StealthManager::new(&config)?;
        Ok(Self {
            world: World::new(),
            config,
            manager,
            physics,
            spies: BTreeMap::new(),
            proximity: ProximityTracker::new(),
            tick: 0,
            elapsed_secs: 0.0,
            command_queue: VecDeque::new(),
            events: Vec::new(),
        })
    }

    /// Queue a command for processing at the start of the next update.
    pub fn queue_command(&mut self, command: StealthCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = StealthCommand>) {
        self.command_queue.extend(commands);
    }

    /// Apply a command immediately.
    pub fn apply_command(&mut self, command: StealthCommand) -> Result<(), SimError> {
        match command {
            StealthCommand::SetPose { handle, pose } => self.set_pose(handle, pose),
            StealthCommand::SetVisibilityRating { spy, rating } => {
                self.set_visibility_rating(spy, rating)
            }
            StealthCommand::SetAudibilityRating { spy, rating } => {
                self.set_audibility_rating(spy, rating)
            }
            StealthCommand::SetTarget { spotter, target } => self.set_target(spotter, target),
            StealthCommand::Trigger(event) => {
                self.handle_trigger(event);
                Ok(())
            }
            StealthCommand::Despawn { handle } => self.despawn(handle),
        }
    }

    /// Advance by one host frame of `dt` seconds. Returns the stealth delta
    /// if a stealth tick was dispatched.
    pub fn update(&mut self, dt: f32) -> Option<f32> {
        self.process_commands();

        if self.config.proximity_triggers {
            for event in self.proximity.run(&self.world, &self.config) {
                self.handle_trigger(event);
            }
        }

        let delta = self.manager.advance(dt)?;
        self.tick += 1;
        self.elapsed_secs += f64::from(delta);
        systems::stealth_tick::run(
            &mut self.world,
            &self.manager,
            &self.physics,
            &self.config,
            delta,
            self.tick,
            &mut self.events,
        );
        Some(delta)
    }

    // --- Lifecycle ---

    /// Spawn a spotter using the engine's default spotter config.
    pub fn spawn_spotter(
        &mut self,
        handle: ColliderHandle,
        pose: Pose,
        behavior: Box<dyn SpotterBehavior>,
    ) -> Result<Entity, SimError> {
        let config = self.config.spotter.clone();
        self.spawn_spotter_with_config(handle, pose, config, behavior)
    }

    pub fn spawn_spotter_with_config(
        &mut self,
        handle: ColliderHandle,
        pose: Pose,
        config: SpotterConfig,
        behavior: Box<dyn SpotterBehavior>,
    ) -> Result<Entity, SimError> {
        self.ensure_free(handle)?;
        let spotter = Spotter::new(handle, config, behavior)?;
        let entity = self.world.spawn((handle, pose, spotter));
        self.manager.register_spotter(handle, entity);
        self.physics.sync_actor(handle, &pose);
        debug!(handle = %handle, "spotter spawned");
        Ok(entity)
    }

    pub fn spawn_spy(&mut self, handle: ColliderHandle, pose: Pose) -> Result<Entity, SimError> {
        self.ensure_free(handle)?;
        let entity = self.world.spawn((handle, pose, Spy::new(handle)));
        self.spies.insert(handle, entity);
        self.physics.sync_actor(handle, &pose);
        debug!(handle = %handle, "spy spawned");
        Ok(entity)
    }

    pub fn spawn_prop(
        &mut self,
        handle: ColliderHandle,
        pose: Pose,
        prop: StealthProp,
    ) -> Result<Entity, SimError> {
        self.ensure_free(handle)?;
        let entity = self.world.spawn((handle, pose, prop));
        self.manager.register_prop(handle, entity);
        self.physics.sync_actor(handle, &pose);
        debug!(handle = %handle, multiplier = prop.multiplier(), "prop spawned");
        Ok(entity)
    }

    /// Remove any actor. Spotters forget a despawned spy, spies drop a
    /// despawned spotter, and spies hidden in a despawned prop leave cover.
    pub fn despawn(&mut self, handle: ColliderHandle) -> Result<(), SimError> {
        if let Some(entity) = self.manager.unregister_spotter(handle) {
            self.remove_entity(handle, entity);
            for (_, spy) in self.world.query_mut::<&mut Spy>() {
                spy.forget_spotter(handle);
            }
            debug!(handle = %handle, "spotter despawned");
        } else if let Some(entity) = self.spies.remove(&handle) {
            self.remove_entity(handle, entity);
            for (_, spotter) in self.world.query_mut::<&mut Spotter>() {
                spotter.forget_spy(handle);
            }
            systems::stealth_tick::drain_events(&mut self.world, &self.manager, self.tick, &mut self.events);
            debug!(handle = %handle, "spy despawned");
        } else if let Some(entity) = self.manager.unregister_prop(handle) {
            self.remove_entity(handle, entity);
            let sheltered: Vec<ColliderHandle> = self
                .world
                .query_mut::<&Spy>()
                .into_iter()
                .filter(|(_, spy)| spy.cover() == Some(handle))
                .map(|(_, spy)| spy.handle())
                .collect();
            for spy in sheltered {
                let notices = self
                    .with_spy(spy, |s| s.exit_cover(handle))
                    .unwrap_or_default();
                self.deliver(spy, notices);
            }
            debug!(handle = %handle, "prop despawned");
        } else {
            return Err(SimError::UnknownHandle(handle));
        }
        Ok(())
    }

    // --- Host inputs ---

    pub fn set_pose(&mut self, handle: ColliderHandle, pose: Pose) -> Result<(), SimError> {
        let entity = self
            .entity_of(handle)
            .ok_or(SimError::UnknownHandle(handle))?;
        if let Ok(mut current) = self.world.get::<&mut Pose>(entity) {
            *current = pose;
        }
        self.physics.sync_actor(handle, &pose);
        Ok(())
    }

    /// Route an overlap from the trigger system. Overlaps involving an
    /// unregistered collider are not applicable and are skipped.
    pub fn handle_trigger(&mut self, event: TriggerEvent) {
        if !self.spies.contains_key(&event.spy) {
            trace!(spy = %event.spy, "trigger for unknown spy");
            return;
        }

        let TriggerEvent {
            phase,
            volume,
            spy,
            other,
        } = event;

        let notices = match volume {
            TriggerVolume::SpyBody => {
                let Some(multiplier) = self.prop(other).map(|p| p.multiplier()) else {
                    trace!(spy = %spy, prop = %other, "trigger for unknown prop");
                    return;
                };
                match phase {
                    TriggerPhase::Enter => {
                        if self.with_spy(spy, |s| s.enter_cover(other, multiplier)) == Some(true) {
                            debug!(spy = %spy, prop = %other, multiplier, "spy took cover");
                        }
                        Vec::new()
                    }
                    TriggerPhase::Exit => self
                        .with_spy(spy, |s| s.exit_cover(other))
                        .unwrap_or_default(),
                }
            }
            TriggerVolume::VisionProbe | TriggerVolume::HearingProbe => {
                if self.manager.spotter(other).is_none() {
                    trace!(spy = %spy, spotter = %other, "trigger for unknown spotter");
                    return;
                }
                self.with_spy(spy, |s| match (volume, phase) {
                    (TriggerVolume::VisionProbe, TriggerPhase::Enter) => s.enter_vision(other),
                    (TriggerVolume::VisionProbe, TriggerPhase::Exit) => s.exit_vision(other),
                    (_, TriggerPhase::Enter) => s.enter_hearing(other),
                    (_, TriggerPhase::Exit) => s.exit_hearing(other),
                })
                .unwrap_or_default()
            }
        };
        self.deliver(spy, notices);
    }

    pub fn set_visibility_rating(&mut self, spy: ColliderHandle, rating: f32) -> Result<(), SimError> {
        ensure_rating(rating)?;
        let notices = self
            .with_spy(spy, |s| s.set_visibility_rating(rating))
            .ok_or(SimError::UnknownSpy(spy))?;
        self.deliver(spy, notices);
        Ok(())
    }

    pub fn set_audibility_rating(&mut self, spy: ColliderHandle, rating: f32) -> Result<(), SimError> {
        ensure_rating(rating)?;
        let notices = self
            .with_spy(spy, |s| s.set_audibility_rating(rating))
            .ok_or(SimError::UnknownSpy(spy))?;
        self.deliver(spy, notices);
        Ok(())
    }

    /// Designate the spy a spotter hunts.
    pub fn set_target(
        &mut self,
        spotter: ColliderHandle,
        target: Option<ColliderHandle>,
    ) -> Result<(), SimError> {
        let entity = self
            .manager
            .spotter(spotter)
            .ok_or(SimError::UnknownSpotter(spotter))?;
        let mut s = self
            .world
            .get::<&mut Spotter>(entity)
            .map_err(|_| SimError::UnknownSpotter(spotter))?;
        s.set_target(target);
        Ok(())
    }

    // --- Queries ---

    pub fn config(&self) -> &StealthConfig {
        &self.config
    }

    pub fn manager(&self) -> &StealthManager {
        &self.manager
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    pub fn spotter(&self, handle: ColliderHandle) -> Option<hecs::Ref<'_, Spotter>> {
        let entity = self.manager.spotter(handle)?;
        self.world.get::<&Spotter>(entity).ok()
    }

    pub fn spy(&self, handle: ColliderHandle) -> Option<hecs::Ref<'_, Spy>> {
        let entity = *self.spies.get(&handle)?;
        self.world.get::<&Spy>(entity).ok()
    }

    pub fn prop(&self, handle: ColliderHandle) -> Option<hecs::Ref<'_, StealthProp>> {
        let entity = self.manager.prop(handle)?;
        self.world.get::<&StealthProp>(entity).ok()
    }

    pub fn pose(&self, handle: ColliderHandle) -> Option<Pose> {
        let entity = self.entity_of(handle)?;
        self.world.get::<&Pose>(entity).ok().map(|pose| *pose)
    }

    /// Vision and hearing probe radii the host should give a spy's
    /// trigger volumes.
    pub fn probe_radii(&self, spy: ColliderHandle) -> Option<(f32, f32)> {
        let spy = self.spy(spy)?;
        Some((
            spy.vision_probe_radius(self.config.max_vision_distance),
            spy.hearing_probe_radius(self.config.max_hearing_distance),
        ))
    }

    /// Take the events recorded since the last drain or snapshot.
    pub fn drain_events(&mut self) -> Vec<TickedEvent> {
        std::mem::take(&mut self.events)
    }

    /// Build a snapshot, handing over the pending events.
    pub fn snapshot(&mut self) -> StealthSnapshot {
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.config,
            self.tick,
            self.elapsed_secs,
            events,
        )
    }

    // --- Internals ---

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.apply_command(command) {
                warn!(%err, "stealth command dropped");
            }
        }
    }

    fn entity_of(&self, handle: ColliderHandle) -> Option<Entity> {
        self.manager
            .spotter(handle)
            .or_else(|| self.spies.get(&handle).copied())
            .or_else(|| self.manager.prop(handle))
    }

    fn ensure_free(&self, handle: ColliderHandle) -> Result<(), SimError> {
        match self.entity_of(handle) {
            Some(_) => Err(SimError::HandleInUse(handle)),
            None => Ok(()),
        }
    }

    fn remove_entity(&mut self, handle: ColliderHandle, entity: Entity) {
        let _ = self.world.despawn(entity);
        self.physics.remove_actor(handle);
        self.proximity.forget(handle);
    }

    fn with_spy<R>(&mut self, handle: ColliderHandle, f: impl FnOnce(&mut Spy) -> R) -> Option<R> {
        let entity = *self.spies.get(&handle)?;
        let mut spy = self.world.get::<&mut Spy>(entity).ok()?;
        Some(f(&mut *spy))
    }

    /// Hand a spy's notices to the addressed spotters, then collect any
    /// events they raised (an audibility interrupt reacts immediately).
    fn deliver(&mut self, spy: ColliderHandle, notices: Vec<SpyNotice>) {
        if notices.is_empty() {
            return;
        }
        for SpyNotice { spotter, notice } in notices {
            let Some(entity) = self.manager.spotter(spotter) else {
                trace!(spy = %spy, spotter = %spotter, "notice for unknown spotter");
                continue;
            };
            let Ok(mut target) = self.world.get::<&mut Spotter>(entity) else {
                continue;
            };
            match notice {
                Notice::Visible => target.on_spy_visible(spy),
                Notice::Invisible => target.on_spy_invisible(spy),
                Notice::VisibilityChange(rating) => target.on_visibility_change(spy, rating),
                Notice::Audible => target.on_spy_audible(spy),
                Notice::Inaudible => target.on_spy_inaudible(spy),
                Notice::AudibilityChange(rating) => target.on_audibility_change(spy, rating),
            }
        }
        systems::stealth_tick::drain_events(&mut self.world, &self.manager, self.tick, &mut self.events);
    }
}

fn ensure_rating(rating: f32) -> Result<(), SimError> {
    if rating.is_finite() && rating >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidRating(rating))
    }
}
