//! Stealth tick system: dispatches one global stealth tick to every
//! registered spotter and collects the events they raise.

use std::collections::BTreeMap;

use glam::Vec3;
use hecs::World;
use tracing::trace;

use stealth_ai::{Senses, Spotter};
use stealth_core::config::StealthConfig;
use stealth_core::events::TickedEvent;
use stealth_core::types::{Capsule, ColliderHandle, LayerMask, Pose};
use stealth_geometry::{has_line_of_sight, PhysicsQuery};

use crate::manager::StealthManager;
use crate::spy::Spy;

/// The world as one spotter perceives it during a tick.
struct WorldSenses<'a, P: ?Sized> {
    spotter_pose: Pose,
    spies: &'a BTreeMap<ColliderHandle, Pose>,
    physics: &'a P,
    capsule: Capsule,
    obstruction_mask: LayerMask,
}

impl<P: PhysicsQuery + ?Sized> Senses for WorldSenses<'_, P> {
    fn spotter_pose(&self) -> Pose {
        self.spotter_pose
    }

    fn spy_pose(&self, spy: ColliderHandle) -> Option<Pose> {
        self.spies.get(&spy).copied()
    }

    /// Cast from the spotter's feet toward the spy's eyes.
    fn line_of_sight(&self, spy: ColliderHandle) -> bool {
        let Some(pose) = self.spies.get(&spy) else {
            return false;
        };
        let eyes = pose.position + Vec3::Y * self.capsule.eye_height();
        has_line_of_sight(
            self.physics,
            self.spotter_pose.position,
            eyes,
            spy,
            &self.capsule,
            self.obstruction_mask,
        )
    }
}

/// Run one stealth tick of `delta` seconds.
pub fn run<P: PhysicsQuery + ?Sized>(
    world: &mut World,
    manager: &StealthManager,
    physics: &P,
    config: &StealthConfig,
    delta: f32,
    tick: u64,
    events: &mut Vec<TickedEvent>,
) {
    let spies: BTreeMap<ColliderHandle, Pose> = world
        .query::<(&ColliderHandle, &Pose, &Spy)>()
        .iter()
        .map(|(_, (handle, pose, _))| (*handle, *pose))
        .collect();

    for (handle, entity) in manager.spotter_handles() {
        let Ok(spotter_pose) = world.get::<&Pose>(entity).map(|pose| *pose) else {
            continue;
        };
        let senses = WorldSenses {
            spotter_pose,
            spies: &spies,
            physics,
            capsule: config.spy_capsule,
            obstruction_mask: config.obstruction_mask,
        };
        let Ok(mut spotter) = world.get::<&mut Spotter>(entity) else {
            continue;
        };
        trace!(tick, spotter = %handle, state = ?spotter.state(), "dispatch stealth tick");
        spotter.on_stealth_tick(delta, &senses);
        collect(&mut spotter, tick, events);
    }
}

/// Move every spotter's pending events into `events`, in handle order.
pub fn drain_events(world: &mut World, manager: &StealthManager, tick: u64, events: &mut Vec<TickedEvent>) {
    for (_, entity) in manager.spotter_handles() {
        if let Ok(mut spotter) = world.get::<&mut Spotter>(entity) {
            collect(&mut spotter, tick, events);
        }
    }
}

fn collect(spotter: &mut Spotter, tick: u64, events: &mut Vec<TickedEvent>) {
    events.extend(
        spotter
            .drain_events()
            .into_iter()
            .map(|event| TickedEvent { tick, event }),
    );
}
