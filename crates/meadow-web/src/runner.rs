use meadow_engine::{
    build_render_buffer, CameraUniform, EngineContext, FixedTimestep, FrameCounts, Game,
    GameConfig, InputEvent, InputQueue, ProtocolLayout, RenderBuffer, HEADER_FLOATS,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]` (see `export_game!`), because wasm-bindgen
/// cannot export generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    /// Handed to every fixed step after the first one of a frame.
    no_input: InputQueue,
    render_buffer: RenderBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    header: [f32; HEADER_FLOATS],
    camera: CameraUniform,
    frame: u32,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::with_max_steps(config.fixed_dt, config.max_steps);
        let layout = ProtocolLayout::from_config(&config);
        let ctx = EngineContext::from_config(&config);
        let camera = ctx.camera.uniform();

        Self {
            game,
            ctx,
            input: InputQueue::new(),
            no_input: InputQueue::new(),
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            timestep,
            layout,
            config,
            header: [0.0; HEADER_FLOATS],
            camera,
            frame: 0,
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction.
    /// `touch_device` is the host's one-time device detection result.
    pub fn init(&mut self, touch_device: bool) {
        if self.initialized {
            log::warn!("GameRunner: init called twice, ignoring");
            return;
        }
        self.ctx.touch_device = touch_device;
        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.publish();
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Viewport changed. Only the projection is affected, never game state.
    pub fn resize(&mut self, width: f32, height: f32) {
        if self.ctx.camera.resize(width, height) {
            self.camera = self.ctx.camera.uniform();
            self.write_header();
        }
    }

    /// Forward a host configuration document to the game.
    /// Rejected documents are logged and leave the game untouched.
    pub fn load_config(&mut self, json: &str) -> bool {
        match self.game.load_config(&mut self.ctx, json) {
            Ok(()) => {
                self.publish();
                true
            }
            Err(err) => {
                log::warn!("GameRunner: config rejected: {}", err);
                false
            }
        }
    }

    /// Run one host frame: fixed-step updates, then rebuild the published buffers.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        // Clear per-frame transient data
        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        for step in 0..steps {
            self.ctx.dt = self.timestep.dt();
            let input = if step == 0 { &self.input } else { &self.no_input };
            self.game.update(&mut self.ctx, input);
        }

        // Input is only consumed once a step has seen it
        if steps > 0 {
            self.input.clear();
        }

        self.publish();
    }

    fn publish(&mut self) {
        build_render_buffer(self.ctx.scene.iter(), &mut self.render_buffer);
        self.camera = self.ctx.camera.uniform();
        self.frame = self.frame.wrapping_add(1);
        self.write_header();
    }

    fn write_header(&mut self) {
        let counts = FrameCounts {
            frame: self.frame,
            instances: self.render_buffer.instances.len(),
            batches: self.render_buffer.batches.len(),
            events: self.ctx.events.len(),
            viewport_width: self.ctx.camera.viewport_width,
            viewport_height: self.ctx.camera.viewport_height,
            elapsed: self.timestep.elapsed(),
            alpha: self.timestep.alpha(),
        };
        self.layout.write_header(&mut self.header, &counts);
    }

    // ---- Game access ----

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // ---- Pointer accessors for shared-buffer reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count().min(self.layout.max_instances as u32)
    }

    pub fn batches_ptr(&self) -> *const f32 {
        self.render_buffer.batches_ptr()
    }

    pub fn batch_count(&self) -> u32 {
        self.render_buffer.batch_count().min(self.layout.max_batches as u32)
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len().min(self.layout.max_events) as u32
    }

    pub fn camera_ptr(&self) -> *const f32 {
        self.camera.view_proj.as_ptr() as *const f32
    }

    /// Copy of the view-projection matrix for hosts without shared memory.
    pub fn camera_matrix(&self) -> js_sys::Float32Array {
        let floats: &[f32] = bytemuck::cast_slice(&self.camera.view_proj);
        js_sys::Float32Array::from(floats)
    }

    pub fn viewport_width(&self) -> f32 {
        self.ctx.camera.viewport_width
    }

    pub fn viewport_height(&self) -> f32 {
        self.ctx.camera.viewport_height
    }

    pub fn elapsed(&self) -> f64 {
        self.timestep.elapsed()
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_instances(&self) -> u32 {
        self.layout.max_instances as u32
    }

    pub fn max_batches(&self) -> u32 {
        self.layout.max_batches as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    pub fn fixed_dt(&self) -> f32 {
        self.config.fixed_dt
    }
}
