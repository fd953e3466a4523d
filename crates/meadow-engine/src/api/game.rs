use std::error::Error;

use glam::Vec3;

use crate::core::scene::Scene;
use crate::api::types::{EntityId, GameEvent};
use crate::input::queue::InputQueue;
use crate::renderer::camera::Camera3D;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Maximum fixed steps run for one host frame (default: 10).
    pub max_steps: u32,
    /// Maximum number of render instances (default: 256).
    pub max_instances: usize,
    /// Maximum number of mesh batches (default: 16).
    pub max_batches: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Vertical field of view in degrees (default: 75).
    pub fov_y_degrees: f32,
    /// Near clip plane (default: 0.1).
    pub near: f32,
    /// Far clip plane (default: 1000).
    pub far: f32,
    /// Initial camera eye position.
    pub camera_eye: Vec3,
    /// Initial camera target.
    pub camera_target: Vec3,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_steps: 10,
            max_instances: 256,
            max_batches: 16,
            max_events: 32,
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            camera_eye: Vec3::new(0.0, 10.0, 20.0),
            camera_target: Vec3::ZERO,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed step. `ctx.dt` holds the step length in seconds.
    /// Input queued since the previous frame is only visible to the first step of a frame.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Apply a JSON configuration document pushed by the host.
    fn load_config(&mut self, _ctx: &mut EngineContext, _json: &str) -> Result<(), Box<dyn Error>> {
        Err("this game does not accept configuration".into())
    }
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub events: Vec<GameEvent>,
    pub camera: Camera3D,
    /// Length of the current step in seconds.
    pub dt: f32,
    /// Whether the host detected a touch device at startup.
    pub touch_device: bool,
    next_id: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::from_config(&GameConfig::default())
    }

    pub fn from_config(config: &GameConfig) -> Self {
        let mut camera = Camera3D::new(config.fov_y_degrees.to_radians(), config.near, config.far);
        camera.look_at(config.camera_eye, config.camera_target);
        Self {
            scene: Scene::new(),
            events: Vec::new(),
            camera,
            dt: config.fixed_dt,
            touch_device: false,
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a game event to be forwarded to TypeScript.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}
