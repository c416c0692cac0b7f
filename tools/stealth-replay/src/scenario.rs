//! Scenario files: a scene, its actors and a script of host commands.
//!
//! A scenario is plain JSON. Everything except `frames` has a default, so
//! the smallest useful file names a few actors and a frame count.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use stealth_ai::PassiveBehavior;
use stealth_core::commands::StealthCommand;
use stealth_core::config::{SpotterConfig, StealthConfig};
use stealth_core::constants::{OBSTRUCTION_LAYER, SPY_LAYER};
use stealth_core::events::TickedEvent;
use stealth_core::state::StealthSnapshot;
use stealth_core::types::{ColliderHandle, Pose};
use stealth_geometry::{SceneBody, SphereScene};
use stealth_sim::{SimError, StealthEngine, StealthProp};

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Sim(#[from] SimError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: StealthConfig,
    /// Host frame length in seconds.
    #[serde(default = "default_frame_dt")]
    pub frame_dt: f32,
    pub frames: u32,
    #[serde(default)]
    pub obstacles: Vec<ObstacleSpec>,
    #[serde(default)]
    pub spotters: Vec<SpotterSpec>,
    #[serde(default)]
    pub spies: Vec<SpySpec>,
    #[serde(default)]
    pub props: Vec<PropSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_frame_dt() -> f32 {
    1.0 / 60.0
}

/// Static sight blocker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub handle: ColliderHandle,
    pub center: Vec3,
    pub radius: f32,
    #[serde(default = "default_obstacle_layer")]
    pub layer: u8,
}

fn default_obstacle_layer() -> u8 {
    OBSTRUCTION_LAYER
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotterSpec {
    pub handle: ColliderHandle,
    #[serde(default)]
    pub pose: Pose,
    /// Overrides the scenario-wide spotter config.
    #[serde(default)]
    pub config: Option<SpotterConfig>,
    #[serde(default)]
    pub target: Option<ColliderHandle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpySpec {
    pub handle: ColliderHandle,
    #[serde(default)]
    pub pose: Pose,
    #[serde(default)]
    pub visibility: Option<f32>,
    #[serde(default)]
    pub audibility: Option<f32>,
    /// Radius of the head sphere sight casts must strike. Defaults to the
    /// reference capsule radius.
    #[serde(default)]
    pub body_radius: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropSpec {
    pub handle: ColliderHandle,
    #[serde(default)]
    pub pose: Pose,
    pub multiplier: f32,
    #[serde(default = "default_prop_radius")]
    pub radius: f32,
}

fn default_prop_radius() -> f32 {
    stealth_core::constants::DEFAULT_PROP_RADIUS
}

/// A command applied at the start of a frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub frame: u32,
    pub command: StealthCommand,
}

/// Result of a replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayReport {
    pub frames: u32,
    pub ticks: u64,
    pub events: Vec<TickedEvent>,
    pub snapshot: StealthSnapshot,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ReplayError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Build the scene and spawn every actor.
    pub fn build(&self) -> Result<StealthEngine, ReplayError> {
        let mut scene = SphereScene::new();
        for obstacle in &self.obstacles {
            scene.add(SceneBody::new(
                obstacle.handle,
                obstacle.center,
                obstacle.radius,
                obstacle.layer,
            ));
        }
        let capsule = self.config.spy_capsule;
        for spy in &self.spies {
            scene.add(SceneBody::actor(
                spy.handle,
                spy.pose.position,
                capsule.eye_height(),
                spy.body_radius.unwrap_or(capsule.radius),
                SPY_LAYER,
            ));
        }

        let mut engine = StealthEngine::new(self.config.clone(), scene)?;

        for prop in &self.props {
            engine.spawn_prop(
                prop.handle,
                prop.pose,
                StealthProp::new(prop.multiplier, prop.radius)?,
            )?;
        }
        for spy in &self.spies {
            engine.spawn_spy(spy.handle, spy.pose)?;
            if let Some(rating) = spy.visibility {
                engine.set_visibility_rating(spy.handle, rating)?;
            }
            if let Some(rating) = spy.audibility {
                engine.set_audibility_rating(spy.handle, rating)?;
            }
        }
        for spotter in &self.spotters {
            let config = spotter
                .config
                .clone()
                .unwrap_or_else(|| self.config.spotter.clone());
            engine.spawn_spotter_with_config(
                spotter.handle,
                spotter.pose,
                config,
                Box::new(PassiveBehavior),
            )?;
            engine.set_target(spotter.handle, spotter.target)?;
        }

        debug!(
            obstacles = self.obstacles.len(),
            spotters = self.spotters.len(),
            spies = self.spies.len(),
            props = self.props.len(),
            "scenario built"
        );
        Ok(engine)
    }

    /// Run every frame and collect the event log.
    pub fn run(&self) -> Result<ReplayReport, ReplayError> {
        let mut engine = self.build()?;
        let mut steps: Vec<&Step> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.frame);
        let mut pending = steps.into_iter().peekable();

        let mut events = Vec::new();
        for frame in 0..self.frames {
            while let Some(step) = pending.next_if(|s| s.frame <= frame) {
                engine.queue_command(step.command.clone());
            }
            engine.update(self.frame_dt);
            events.extend(engine.drain_events());
        }

        info!(
            frames = self.frames,
            ticks = engine.tick(),
            events = events.len(),
            "replay finished"
        );
        Ok(ReplayReport {
            frames: self.frames,
            ticks: engine.tick(),
            events,
            snapshot: engine.snapshot(),
        })
    }
}
