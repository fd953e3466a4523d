use crate::api::types::MeshId;

/// Visual component — tells the render collaborator what to draw for an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    /// Which mesh to draw.
    pub mesh: MeshId,
    /// Game-defined variant (e.g. a colour palette index).
    pub variant: u32,
    /// Mesh-specific parameter (highlight state, animation angle, ...).
    pub param: f32,
}

impl Visual {
    pub fn new(mesh: MeshId) -> Self {
        Self {
            mesh,
            variant: 0,
            param: 0.0,
        }
    }

    pub fn with_variant(mut self, variant: u32) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_param(mut self, param: f32) -> Self {
        self.param = param;
        self
    }
}
