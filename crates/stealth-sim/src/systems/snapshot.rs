//! Snapshot system: queries the ECS world and builds a complete StealthSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use stealth_ai::Spotter;
use stealth_core::config::StealthConfig;
use stealth_core::events::TickedEvent;
use stealth_core::state::{SpotterView, SpyView, StealthSnapshot};
use stealth_core::types::{ColliderHandle, Pose};

use crate::spy::Spy;

/// Build a complete StealthSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    config: &StealthConfig,
    tick: u64,
    elapsed_secs: f64,
    events: Vec<TickedEvent>,
) -> StealthSnapshot {
    StealthSnapshot {
        tick,
        elapsed_secs,
        spotters: build_spotters(world),
        spies: build_spies(world, config),
        events,
    }
}

fn build_spotters(world: &World) -> Vec<SpotterView> {
    let mut spotters: Vec<SpotterView> = world
        .query::<(&ColliderHandle, &Pose, &Spotter)>()
        .iter()
        .map(|(_, (handle, pose, spotter))| SpotterView {
            handle: *handle,
            pose: *pose,
            state: spotter.state(),
            pursued_spy: spotter.pursued_spy(),
            target: spotter.target(),
            last_seen: spotter.last_seen(),
            visible_spies: spotter.visible_count(),
            audible_spies: spotter.audible_count(),
            ignored_spies: spotter.ignored_count(),
        })
        .collect();

    spotters.sort_by_key(|s| s.handle);
    spotters
}

fn build_spies(world: &World, config: &StealthConfig) -> Vec<SpyView> {
    let mut spies: Vec<SpyView> = world
        .query::<(&ColliderHandle, &Pose, &Spy)>()
        .iter()
        .map(|(_, (handle, pose, spy))| SpyView {
            handle: *handle,
            pose: *pose,
            visibility: spy.visibility(),
            audibility: spy.audibility(),
            hidden: spy.is_hidden(),
            cover: spy.cover(),
            watched_by_sight: spy.sight_watchers(),
            watched_by_hearing: spy.hearing_watchers(),
            vision_probe_radius: spy.vision_probe_radius(config.max_vision_distance),
            hearing_probe_radius: spy.hearing_probe_radius(config.max_hearing_distance),
        })
        .collect();

    spies.sort_by_key(|s| s.handle);
    spies
}
