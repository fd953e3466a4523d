use glam::Vec3;
use crate::api::types::EntityId;
use crate::components::visual::Visual;

/// Fat Entity — a single struct with optional components.
/// Y is up; headings are yaw angles around Y, with 0 facing +Z.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Whether this entity is active (inactive entities are not published).
    pub active: bool,
    /// Position in world space.
    pub pos: Vec3,
    /// Yaw in radians.
    pub heading: f32,
    /// Uniform scale in world units.
    pub scale: f32,
    /// Visual component (optional — entities without one are invisible).
    pub visual: Option<Visual>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec3::ZERO,
            heading: 0.0,
            scale: 1.0,
            visual: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_heading(mut self, heading: f32) -> Self {
        self.heading = heading;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_visual(mut self, visual: Visual) -> Self {
        self.visual = Some(visual);
        self
    }
}
