use std::error::Error;

use meadow_engine::*;

use crate::bee::{LEFT_WING_OFFSET, RIGHT_WING_OFFSET};
use crate::hud::{display_seconds, Hud};
use crate::input::{InputMode, JoystickLayout};
use crate::scenery::{PropKind, PROPS};
use crate::session::{GameSession, Phase};
use crate::tuning::Tuning;

// Mesh ids (mirrored by the renderer)
pub const MESH_GROUND: MeshId = MeshId(0);
pub const MESH_HILL: MeshId = MeshId(1);
pub const MESH_TREE: MeshId = MeshId(2);
pub const MESH_FLOWER: MeshId = MeshId(3);
pub const MESH_BEE: MeshId = MeshId(4);
pub const MESH_WING: MeshId = MeshId(5);

/// Published instance capacity. Bounds the meadow size a tuning may ask for.
pub const MAX_INSTANCES: usize = 64;

// Game event kinds (Rust → host)
pub const EVENT_NECTAR: f32 = 1.0;
pub const EVENT_TIME: f32 = 2.0;
pub const EVENT_LIVES: f32 = 3.0;
pub const EVENT_PHASE: f32 = 4.0;

/// Last values sent as game events.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Published {
    nectar: u32,
    seconds: u32,
    lives: u32,
    phase: Phase,
}

pub struct NectarGame {
    session: GameSession,
    hud: Hud,
    published: Option<Published>,
    bee: Option<EntityId>,
    wings: Option<[EntityId; 2]>,
    flowers: Vec<EntityId>,
}

impl NectarGame {
    pub fn new() -> Self {
        Self::with_tuning(Tuning::default())
    }

    pub fn with_tuning(tuning: Tuning) -> Self {
        Self {
            session: GameSession::new(tuning, InputMode::Keyboard),
            hud: Hud::new(),
            published: None,
            bee: None,
            wings: None,
            flowers: Vec::new(),
        }
    }

    pub fn hud_json(&self) -> &str {
        self.hud.json()
    }

    pub fn hud_revision(&self) -> u32 {
        self.hud.revision()
    }

    /// Rebuild the scene from the session: scenery, flowers, bee and wings.
    fn spawn_level(&mut self, ctx: &mut EngineContext) {
        ctx.scene.clear();

        for prop in PROPS.iter() {
            let (tag, mesh) = match prop.kind {
                PropKind::Ground => ("ground", MESH_GROUND),
                PropKind::Hill => ("hill", MESH_HILL),
                PropKind::Tree => ("tree", MESH_TREE),
            };
            let id = ctx.next_id();
            ctx.scene.spawn(
                Entity::new(id)
                    .with_tag(tag)
                    .with_pos(prop.position)
                    .with_scale(prop.size)
                    .with_visual(Visual::new(mesh)),
            );
        }

        self.flowers.clear();
        for flower in self.session.meadow().flowers() {
            let id = ctx.next_id();
            ctx.scene.spawn(
                Entity::new(id)
                    .with_tag("flower")
                    .with_pos(flower.position)
                    .with_heading(flower.heading)
                    .with_visual(Visual::new(MESH_FLOWER).with_variant(flower.variant)),
            );
            self.flowers.push(id);
        }

        let bee = ctx.next_id();
        ctx.scene.spawn(Entity::new(bee).with_tag("bee").with_visual(Visual::new(MESH_BEE)));
        let mut wings = [bee; 2];
        for (slot, variant) in wings.iter_mut().zip([0, 1]) {
            *slot = ctx.next_id();
            ctx.scene.spawn(
                Entity::new(*slot)
                    .with_tag("wing")
                    .with_visual(Visual::new(MESH_WING).with_variant(variant)),
            );
        }
        self.bee = Some(bee);
        self.wings = Some(wings);

        self.sync_scene(ctx);
        self.published = None;
        self.hud.refresh(self.session.state(), self.session.tuning());
    }

    /// Copy session state onto the scene entities.
    fn sync_scene(&self, ctx: &mut EngineContext) {
        let bee = self.session.bee();
        if let Some(entity) = self.bee.and_then(|id| ctx.scene.get_mut(id)) {
            entity.pos = bee.position;
            entity.heading = bee.heading;
        }

        if let Some(wings) = self.wings {
            let (left, right) = bee.wing_tilts(&self.session.tuning().bee);
            let placements = [(LEFT_WING_OFFSET, left), (RIGHT_WING_OFFSET, right)];
            for (id, (offset, tilt)) in wings.into_iter().zip(placements) {
                if let Some(entity) = ctx.scene.get_mut(id) {
                    entity.pos = bee.local_to_world(offset);
                    entity.heading = bee.heading;
                    if let Some(visual) = entity.visual.as_mut() {
                        visual.param = tilt;
                    }
                }
            }
        }

        for (id, flower) in self.flowers.iter().zip(self.session.meadow().flowers()) {
            if let Some(visual) = ctx.scene.get_mut(*id).and_then(|e| e.visual.as_mut()) {
                visual.param = flower.look().param();
            }
        }
    }

    /// Emit an event for each HUD value that changed, then refresh the HUD.
    fn publish_state(&mut self, ctx: &mut EngineContext) {
        let state = self.session.state();
        let now = Published {
            nectar: state.nectar_collected,
            seconds: display_seconds(state.time_remaining),
            lives: state.lives,
            phase: state.phase,
        };
        let last = self.published;
        let changed = |f: fn(&Published) -> f32| last.map_or(true, |l| f(&l) != f(&now));

        if changed(|p| p.nectar as f32) {
            ctx.emit_event(GameEvent::scalar(EVENT_NECTAR, now.nectar as f32));
        }
        if changed(|p| p.seconds as f32) {
            ctx.emit_event(GameEvent::scalar(EVENT_TIME, now.seconds as f32));
        }
        if changed(|p| p.lives as f32) {
            ctx.emit_event(GameEvent::scalar(EVENT_LIVES, now.lives as f32));
        }
        if changed(|p| p.phase.code()) {
            ctx.emit_event(GameEvent::scalar(EVENT_PHASE, now.phase.code()));
        }
        self.published = Some(now);

        self.hud.refresh(self.session.state(), self.session.tuning());
    }

    fn log_transition(&self, phase: Phase) {
        let state = self.session.state();
        match phase {
            Phase::LevelComplete => log::info!(
                "level complete: {}/{} nectar with {}s left",
                state.nectar_collected,
                state.target_nectar,
                display_seconds(state.time_remaining)
            ),
            Phase::LevelFailed => log::info!(
                "level failed: {}/{} nectar, {} lives left",
                state.nectar_collected,
                state.target_nectar,
                state.lives
            ),
            Phase::GameOver => log::info!(
                "game over: {}/{} nectar",
                state.nectar_collected,
                state.target_nectar
            ),
            Phase::Idle | Phase::Running => {}
        }
    }
}

impl Default for NectarGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for NectarGame {
    fn config(&self) -> GameConfig {
        GameConfig {
            max_instances: MAX_INSTANCES,
            max_batches: 8,
            max_events: 64,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        let mode = if ctx.touch_device { InputMode::Touch } else { InputMode::Keyboard };
        self.session = GameSession::new(self.session.tuning().clone(), mode);
        self.spawn_level(ctx);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        let joystick = JoystickLayout::new(&self.session.tuning().touch, ctx.camera.viewport_height);
        let report = self.session.step(ctx.dt, input, &joystick);

        if report.started {
            let state = self.session.state();
            log::info!(
                "level started: {} nectar in {}s, {} lives",
                state.target_nectar,
                display_seconds(state.time_remaining),
                state.lives
            );
        }
        if let Some(phase) = report.transition {
            self.log_transition(phase);
        }

        self.sync_scene(ctx);
        self.publish_state(ctx);
    }

    fn load_config(&mut self, ctx: &mut EngineContext, json: &str) -> Result<(), Box<dyn Error>> {
        let tuning = Tuning::from_json(json)?;
        self.session.retune(tuning)?;
        self.spawn_level(ctx);
        log::info!(
            "tuning applied: {} flowers, target {}",
            self.session.meadow().flowers().len(),
            self.session.state().target_nectar
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const KEY_SPACE: u32 = 32;
    const KEY_W: u32 = 87;

    fn started() -> (NectarGame, EngineContext) {
        let mut game = NectarGame::new();
        let mut ctx = EngineContext::from_config(&game.config());
        game.init(&mut ctx);
        (game, ctx)
    }

    fn press(key_code: u32) -> InputQueue {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::KeyDown { key_code });
        queue
    }

    fn events_of(ctx: &EngineContext, kind: f32) -> Vec<f32> {
        ctx.events.iter().filter(|e| e.kind == kind).map(|e| e.a).collect()
    }

    #[test]
    fn init_spawns_the_level() {
        let (game, ctx) = started();
        assert_eq!(ctx.scene.find_all_by_tag("flower").len(), 15);
        assert_eq!(ctx.scene.find_all_by_tag("hill").len(), 3);
        assert_eq!(ctx.scene.find_all_by_tag("tree").len(), 3);
        assert_eq!(ctx.scene.find_all_by_tag("wing").len(), 2);
        assert_eq!(ctx.scene.len(), 7 + 15 + 3);

        let bee = ctx.scene.find_by_tag("bee").unwrap();
        assert_eq!(bee.pos, glam::Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(game.session.state().phase, Phase::Idle);
        assert!(game.hud_json().contains("Level 1: Gathering Nectar"));
    }

    #[test]
    fn touch_device_selects_touch_mode() {
        let mut game = NectarGame::new();
        let mut ctx = EngineContext::new();
        ctx.touch_device = true;
        game.init(&mut ctx);
        assert_eq!(game.session.state().input_mode, InputMode::Touch);
        assert!(game.hud_json().contains("Tap anywhere to start!"));
    }

    #[test]
    fn space_starts_and_events_follow() {
        let (mut game, mut ctx) = started();
        game.update(&mut ctx, &press(KEY_SPACE));
        assert_eq!(game.session.state().phase, Phase::Running);
        // First update publishes every value
        assert_eq!(events_of(&ctx, EVENT_PHASE), vec![Phase::Running.code()]);
        assert_eq!(events_of(&ctx, EVENT_NECTAR), vec![0.0]);
        assert_eq!(events_of(&ctx, EVENT_LIVES), vec![3.0]);
        assert_eq!(events_of(&ctx, EVENT_TIME), vec![120.0]);

        ctx.clear_frame_data();
        game.update(&mut ctx, &InputQueue::new());
        // Still within the 120th second: nothing changed
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn flying_moves_bee_and_wings_together() {
        let (mut game, mut ctx) = started();
        game.update(&mut ctx, &press(KEY_SPACE));
        game.update(&mut ctx, &press(KEY_W));
        for _ in 0..59 {
            game.update(&mut ctx, &InputQueue::new());
        }

        let bee = ctx.scene.find_by_tag("bee").unwrap().pos;
        assert_abs_diff_eq!(bee.z, 9.0, epsilon = 1e-3);
        for wing in ctx.scene.find_all_by_tag("wing") {
            assert_abs_diff_eq!(wing.pos.y, bee.y + 0.3, epsilon = 1e-4);
            assert_abs_diff_eq!(wing.pos.z, bee.z, epsilon = 1e-4);
        }
    }

    #[test]
    fn flower_params_track_collection() {
        let (mut game, mut ctx) = started();
        game.update(&mut ctx, &press(KEY_SPACE));
        let flower = game.session.meadow().flowers()[0].position;
        let id = game.flowers[0];

        // Hover over the first flower: highlighted, not yet collected
        game.session.bee_mut().position = flower + glam::Vec3::Y;
        game.update(&mut ctx, &InputQueue::new());
        let param = ctx.scene.get(id).and_then(|e| e.visual.as_ref()).map(|v| v.param);
        assert_eq!(param, Some(crate::flowers::FlowerLook::InRange.param()));

        game.update(&mut ctx, &press(KEY_SPACE));
        let param = ctx.scene.get(id).and_then(|e| e.visual.as_ref()).map(|v| v.param);
        assert_eq!(param, Some(crate::flowers::FlowerLook::Depleted.param()));
        assert_eq!(game.session.state().nectar_collected, 1);
    }

    #[test]
    fn render_buffer_batches_by_mesh() {
        let (_, ctx) = started();
        let mut buffer = RenderBuffer::new();
        build_render_buffer(ctx.scene.iter(), &mut buffer);
        assert_eq!(buffer.instances.len(), 25);
        assert_eq!(buffer.batches.len(), 6);
        assert_eq!(buffer.batches[MESH_FLOWER.0 as usize].count, 15.0);
    }

    #[test]
    fn config_is_refused_while_running() {
        let (mut game, mut ctx) = started();
        game.update(&mut ctx, &press(KEY_SPACE));
        assert!(game.load_config(&mut ctx, r#"{ "meadow": { "flower_count": 20 } }"#).is_err());
        assert_eq!(ctx.scene.find_all_by_tag("flower").len(), 15);
    }

    #[test]
    fn config_rebuilds_the_level_when_idle() {
        let (mut game, mut ctx) = started();
        game.load_config(&mut ctx, r#"{ "meadow": { "flower_count": 20 }, "level": { "duration": 45 } }"#)
            .unwrap();
        assert_eq!(ctx.scene.find_all_by_tag("flower").len(), 20);
        assert_eq!(ctx.scene.find_all_by_tag("bee").len(), 1);
        assert_eq!(game.session.state().time_remaining, 45.0);

        assert!(game.load_config(&mut ctx, "not json").is_err());
        assert_eq!(ctx.scene.find_all_by_tag("flower").len(), 20);
    }

    #[test]
    fn largest_meadow_still_publishes_the_bee() {
        let (mut game, mut ctx) = started();
        let json = format!(r#"{{ "meadow": {{ "flower_count": {} }} }}"#, crate::tuning::MAX_FLOWERS);
        game.load_config(&mut ctx, &json).unwrap();

        let mut buffer = RenderBuffer::new();
        build_render_buffer(ctx.scene.iter(), &mut buffer);
        assert_eq!(buffer.instances.len(), MAX_INSTANCES);
        let bee = &buffer.batches[MESH_BEE.0 as usize];
        let wings = &buffer.batches[MESH_WING.0 as usize];
        assert_eq!(bee.count, 1.0);
        assert_eq!(wings.start + wings.count, MAX_INSTANCES as f32);

        assert!(game.load_config(&mut ctx, r#"{ "meadow": { "flower_count": 60 } }"#).is_err());
        assert_eq!(ctx.scene.find_all_by_tag("flower").len(), crate::tuning::MAX_FLOWERS as usize);
    }
}
