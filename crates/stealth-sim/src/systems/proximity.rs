//! Built-in trigger system for hosts without a physics engine.
//!
//! Overlaps are decided by distance between ground anchors: a spy body
//! touches a prop inside the prop's radius, and a spotter is inside a spy's
//! vision or hearing probe when closer than the probe radius. Each run
//! diffs the current overlaps against the previous run and reports the
//! difference as trigger events, exits first.

use std::collections::BTreeSet;

use hecs::World;

use stealth_ai::Spotter;
use stealth_core::commands::TriggerEvent;
use stealth_core::config::StealthConfig;
use stealth_core::enums::TriggerVolume;
use stealth_core::types::{ColliderHandle, Pose};

use crate::prop::StealthProp;
use crate::spy::Spy;

/// (spy, volume, prop or spotter)
type Contact = (ColliderHandle, TriggerVolume, ColliderHandle);

#[derive(Debug, Default)]
pub struct ProximityTracker {
    contacts: BTreeSet<Contact>,
}

impl ProximityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn is_touching(&self, spy: ColliderHandle, volume: TriggerVolume, other: ColliderHandle) -> bool {
        self.contacts.contains(&(spy, volume, other))
    }

    /// Drop every overlap involving a despawned actor without reporting
    /// exits; despawn notifies counterparts itself.
    pub fn forget(&mut self, handle: ColliderHandle) {
        self.contacts
            .retain(|(spy, _, other)| *spy != handle && *other != handle);
    }

    /// Compute this frame's enter/exit events.
    pub fn run(&mut self, world: &World, config: &StealthConfig) -> Vec<TriggerEvent> {
        let current = current_contacts(world, config);

        let mut events: Vec<TriggerEvent> = self
            .contacts
            .difference(&current)
            .map(|(spy, volume, other)| TriggerEvent::exit(*volume, *spy, *other))
            .collect();
        events.extend(
            current
                .difference(&self.contacts)
                .map(|(spy, volume, other)| TriggerEvent::enter(*volume, *spy, *other)),
        );

        self.contacts = current;
        events
    }
}

fn current_contacts(world: &World, config: &StealthConfig) -> BTreeSet<Contact> {
    let spotters: Vec<(ColliderHandle, Pose)> = world
        .query::<(&ColliderHandle, &Pose, &Spotter)>()
        .iter()
        .map(|(_, (handle, pose, _))| (*handle, *pose))
        .collect();
    let props: Vec<(ColliderHandle, Pose, f32)> = world
        .query::<(&ColliderHandle, &Pose, &StealthProp)>()
        .iter()
        .map(|(_, (handle, pose, prop))| (*handle, *pose, prop.radius()))
        .collect();

    let mut contacts = BTreeSet::new();
    for (_, (spy_handle, spy_pose, spy)) in world.query::<(&ColliderHandle, &Pose, &Spy)>().iter() {
        for (prop_handle, prop_pose, radius) in &props {
            if within(spy_pose, prop_pose, *radius) {
                contacts.insert((*spy_handle, TriggerVolume::SpyBody, *prop_handle));
            }
        }

        let vision = spy.vision_probe_radius(config.max_vision_distance);
        let hearing = spy.hearing_probe_radius(config.max_hearing_distance);
        for (spotter_handle, spotter_pose) in &spotters {
            if within(spy_pose, spotter_pose, vision) {
                contacts.insert((*spy_handle, TriggerVolume::VisionProbe, *spotter_handle));
            }
            if within(spy_pose, spotter_pose, hearing) {
                contacts.insert((*spy_handle, TriggerVolume::HearingProbe, *spotter_handle));
            }
        }
    }
    contacts
}

fn within(a: &Pose, b: &Pose, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}
