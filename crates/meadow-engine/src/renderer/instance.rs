use bytemuck::{Pod, Zeroable};

/// Per-instance render data written to the shared buffer for the TypeScript renderer.
/// Must match the TypeScript protocol: 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// X position in world space.
    pub x: f32,
    /// Y position in world space (up).
    pub y: f32,
    /// Z position in world space.
    pub z: f32,
    /// Yaw around +Y in radians.
    pub heading: f32,
    /// Uniform scale in world units.
    pub scale: f32,
    /// Mesh id.
    pub mesh: f32,
    /// Game-defined variant.
    pub variant: f32,
    /// Mesh-specific parameter.
    pub param: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// A contiguous run of instances sharing one mesh, drawn with a single instanced call.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct MeshBatch {
    pub mesh: f32,
    pub start: f32,
    pub count: f32,
}

impl MeshBatch {
    pub const FLOATS: usize = 3;
}

/// Render buffer containing all mesh instances, ordered by mesh id.
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
    pub batches: Vec<MeshBatch>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(max_instances: usize) -> Self {
        Self {
            instances: Vec::with_capacity(max_instances),
            batches: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.batches.clear();
    }

    /// Append an instance, extending the last batch when the mesh matches.
    pub fn push(&mut self, instance: RenderInstance) {
        let index = self.instances.len() as f32;
        match self.batches.last_mut() {
            Some(batch) if batch.mesh == instance.mesh => batch.count += 1.0,
            _ => self.batches.push(MeshBatch {
                mesh: instance.mesh,
                start: index,
                count: 1.0,
            }),
        }
        self.instances.push(instance);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn batch_count(&self) -> u32 {
        self.batches.len() as u32
    }

    /// Raw pointer to instance data for shared-buffer reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }

    /// Raw pointer to batch data for shared-buffer reads.
    pub fn batches_ptr(&self) -> *const f32 {
        self.batches.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(mesh: f32) -> RenderInstance {
        RenderInstance { mesh, ..Default::default() }
    }

    #[test]
    fn render_instance_is_8_floats() {
        assert_eq!(std::mem::size_of::<RenderInstance>(), RenderInstance::STRIDE_BYTES);
        assert_eq!(std::mem::size_of::<MeshBatch>(), MeshBatch::FLOATS * 4);
    }

    #[test]
    fn push_extends_matching_batch() {
        let mut buf = RenderBuffer::new();
        buf.push(instance(1.0));
        buf.push(instance(1.0));
        buf.push(instance(2.0));
        assert_eq!(buf.instance_count(), 3);
        assert_eq!(buf.batches, vec![
            MeshBatch { mesh: 1.0, start: 0.0, count: 2.0 },
            MeshBatch { mesh: 2.0, start: 2.0, count: 1.0 },
        ]);
    }

    #[test]
    fn clear_drops_batches() {
        let mut buf = RenderBuffer::new();
        buf.push(instance(0.0));
        buf.clear();
        assert_eq!(buf.instance_count(), 0);
        assert_eq!(buf.batch_count(), 0);
    }
}
