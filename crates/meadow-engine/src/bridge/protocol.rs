/// Shared buffer layout.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Instances: max_instances × 8 floats]
/// [Batches: max_batches × 3 floats]
/// [Events: max_events × 4 floats]
/// [Camera: 16 floats]
/// ```
///
/// Capacities are written into the header every frame.
/// TypeScript reads them from the header to compute offsets dynamically.

use crate::api::game::GameConfig;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_PROTOCOL_VERSION: usize = 2;
pub const HEADER_MAX_INSTANCES: usize = 3;
pub const HEADER_INSTANCE_COUNT: usize = 4;
pub const HEADER_MAX_BATCHES: usize = 5;
pub const HEADER_BATCH_COUNT: usize = 6;
pub const HEADER_MAX_EVENTS: usize = 7;
pub const HEADER_EVENT_COUNT: usize = 8;
pub const HEADER_VIEWPORT_WIDTH: usize = 9;
pub const HEADER_VIEWPORT_HEIGHT: usize = 10;
pub const HEADER_ELAPSED: usize = 11;
pub const HEADER_INTERPOLATION_ALPHA: usize = 12;
// 13..16 reserved

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per render instance: x, y, z, heading, scale, mesh, variant, param.
pub const INSTANCE_FLOATS: usize = 8;

/// Floats per mesh batch: mesh, start, count.
pub const BATCH_FLOATS: usize = 3;

/// Floats per game event: kind, a, b, c.
pub const EVENT_FLOATS: usize = 4;

/// Floats in the camera block (column-major view-projection matrix).
pub const CAMERA_FLOATS: usize = 16;

/// Per-frame values written into the header next to the fixed capacities.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameCounts {
    pub frame: u32,
    pub instances: usize,
    pub batches: usize,
    pub events: usize,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub elapsed: f64,
    pub alpha: f32,
}

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_instances: usize,
    pub max_batches: usize,
    pub max_events: usize,

    /// Offset (in floats) where instance data begins.
    pub instance_data_offset: usize,
    /// Offset (in floats) where batch data begins.
    pub batch_data_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,
    /// Offset (in floats) where the camera matrix begins.
    pub camera_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_instances: usize, max_batches: usize, max_events: usize) -> Self {
        let instance_data_offset = HEADER_FLOATS;
        let batch_data_offset = instance_data_offset + max_instances * INSTANCE_FLOATS;
        let event_data_offset = batch_data_offset + max_batches * BATCH_FLOATS;
        let camera_data_offset = event_data_offset + max_events * EVENT_FLOATS;
        let buffer_total_floats = camera_data_offset + CAMERA_FLOATS;

        Self {
            max_instances,
            max_batches,
            max_events,
            instance_data_offset,
            batch_data_offset,
            event_data_offset,
            camera_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from a GameConfig.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.max_instances, config.max_batches, config.max_events)
    }

    /// Fill the header block. Counts above capacity are clamped so the reader
    /// never walks past a section.
    pub fn write_header(&self, header: &mut [f32; HEADER_FLOATS], counts: &FrameCounts) {
        header.fill(0.0);
        header[HEADER_FRAME_COUNTER] = counts.frame as f32;
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_MAX_INSTANCES] = self.max_instances as f32;
        header[HEADER_INSTANCE_COUNT] = counts.instances.min(self.max_instances) as f32;
        header[HEADER_MAX_BATCHES] = self.max_batches as f32;
        header[HEADER_BATCH_COUNT] = counts.batches.min(self.max_batches) as f32;
        header[HEADER_MAX_EVENTS] = self.max_events as f32;
        header[HEADER_EVENT_COUNT] = counts.events.min(self.max_events) as f32;
        header[HEADER_VIEWPORT_WIDTH] = counts.viewport_width;
        header[HEADER_VIEWPORT_HEIGHT] = counts.viewport_height;
        header[HEADER_ELAPSED] = counts.elapsed as f32;
        header[HEADER_INTERPOLATION_ALPHA] = counts.alpha;
    }
}
