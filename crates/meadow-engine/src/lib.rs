pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{EntityId, MeshId, GameEvent};
pub use components::entity::Entity;
pub use components::visual::Visual;
pub use crate::core::scene::Scene;
pub use crate::core::time::FixedTimestep;
pub use renderer::instance::{RenderInstance, RenderBuffer, MeshBatch};
pub use renderer::camera::{Camera3D, CameraUniform};
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::{ProtocolLayout, FrameCounts, HEADER_FLOATS};
pub use systems::render::build_render_buffer;
pub use systems::rng::Rng;
