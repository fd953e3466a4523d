//! Level state machine: one owned session advanced by an explicit `tick`.

use meadow_engine::InputQueue;

use crate::bee::{Bee, WorldBounds};
use crate::flowers::Meadow;
use crate::input::{InputMode, InputState, InputVector, JoystickLayout};
use crate::tuning::{Tuning, TuningError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    LevelComplete,
    LevelFailed,
    GameOver,
}

impl Phase {
    /// Numeric code published in game events.
    pub fn code(self) -> f32 {
        match self {
            Phase::Idle => 0.0,
            Phase::Running => 1.0,
            Phase::LevelComplete => 2.0,
            Phase::LevelFailed => 3.0,
            Phase::GameOver => 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub nectar_collected: u32,
    pub target_nectar: u32,
    /// Seconds, never below zero.
    pub time_remaining: f32,
    pub lives: u32,
    pub phase: Phase,
    pub input_mode: InputMode,
}

impl GameState {
    fn fresh(tuning: &Tuning, input_mode: InputMode) -> Self {
        Self {
            nectar_collected: 0,
            target_nectar: tuning.level.target_nectar,
            time_remaining: tuning.level.duration,
            lives: tuning.level.starting_lives,
            phase: Phase::Idle,
            input_mode,
        }
    }

    pub fn running(&self) -> bool {
        self.phase == Phase::Running
    }
}

pub struct GameSession {
    tuning: Tuning,
    state: GameState,
    input: InputState,
    bee: Bee,
    bounds: WorldBounds,
    meadow: Meadow,
}

impl GameSession {
    pub fn new(tuning: Tuning, input_mode: InputMode) -> Self {
        let meadow = Meadow::scatter(&tuning.meadow);
        Self::with_meadow(tuning, input_mode, meadow)
    }

    /// Session over a hand-placed flower set.
    pub fn with_meadow(tuning: Tuning, input_mode: InputMode, meadow: Meadow) -> Self {
        let input = InputState::new(input_mode);
        Self {
            state: GameState::fresh(&tuning, input.mode()),
            input,
            bee: Bee::spawn(&tuning.bee),
            bounds: WorldBounds::from_tuning(&tuning.bee),
            meadow,
            tuning,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn bee(&self) -> &Bee {
        &self.bee
    }

    pub fn meadow(&self) -> &Meadow {
        &self.meadow
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    #[cfg(test)]
    pub(crate) fn bee_mut(&mut self) -> &mut Bee {
        &mut self.bee
    }

    /// Replace the tuning and rebuild the level around it, back in Idle.
    /// Refused while a level is running.
    pub fn retune(&mut self, tuning: Tuning) -> Result<(), TuningError> {
        if self.state.running() {
            return Err(TuningError::LevelRunning);
        }
        tuning.validate()?;
        *self = Self::new(tuning, self.state.input_mode);
        Ok(())
    }

    /// Enter Running with a full level. Returns false (and changes nothing)
    /// when a level is already running.
    pub fn start_level(&mut self) -> bool {
        if self.state.running() {
            return false;
        }
        self.state.nectar_collected = 0;
        self.state.time_remaining = self.tuning.level.duration;
        self.state.phase = Phase::Running;
        self.bee.reset(&self.tuning.bee);
        self.meadow.refill();
        true
    }

    /// One fixed step driven by raw device events: fold them into the input
    /// state in arrival order, honour a start trigger, then tick.
    /// Events after the start trigger see the level as running.
    pub fn step(&mut self, dt: f32, events: &InputQueue, joystick: &JoystickLayout) -> StepReport {
        let mut started = false;
        for event in events.iter() {
            if self.input.apply(event, self.state.running(), joystick) {
                started |= self.start_level();
            }
        }
        let vector = self.input.vector();
        let transition = self.tick(dt, &vector);
        StepReport { started, transition }
    }

    /// Advance a running level by `dt` seconds. Frozen outside Running.
    /// Returns the phase entered when the level ends this tick.
    pub fn tick(&mut self, dt: f32, input: &InputVector) -> Option<Phase> {
        if !self.state.running() {
            return None;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.bee.advance(input, dt, &self.tuning.bee, &self.bounds);
        self.bee.flap(dt, &self.tuning.bee);

        let gathered = self.meadow.sweep(
            self.bee.position,
            input.collect,
            self.state.nectar_collected,
            self.state.target_nectar,
        );
        self.state.nectar_collected += gathered;
        if self.state.nectar_collected >= self.state.target_nectar {
            return Some(self.finish(Phase::LevelComplete));
        }

        self.state.time_remaining = (self.state.time_remaining - dt).max(0.0);
        if self.state.time_remaining > 0.0 {
            return None;
        }

        self.state.lives = self.state.lives.saturating_sub(1);
        if self.state.lives > 0 {
            Some(self.finish(Phase::LevelFailed))
        } else {
            self.state.lives = self.tuning.level.starting_lives;
            Some(self.finish(Phase::GameOver))
        }
    }

    fn finish(&mut self, phase: Phase) -> Phase {
        self.state.phase = phase;
        self.meadow.clear_highlights();
        phase
    }
}

/// What happened during one `GameSession::step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    pub started: bool,
    pub transition: Option<Phase>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flowers::Flower;
    use crate::tuning::TouchTuning;
    use approx::assert_abs_diff_eq;
    use glam::Vec3;
    use meadow_engine::InputEvent;

    const DT: f32 = 1.0 / 60.0;

    fn collect() -> InputVector {
        InputVector { collect: true, ..InputVector::default() }
    }

    /// Session whose flowers sit around the spawn point (0, 2, 0).
    fn session_with(points: &[(f32, f32)]) -> GameSession {
        let flowers = points
            .iter()
            .map(|&(x, z)| Flower::new(Vec3::new(x, 1.0, z), 1))
            .chain((0..12).map(|i| Flower::new(Vec3::new(30.0, 0.0, i as f32 * 2.0), 1)))
            .collect();
        GameSession::with_meadow(Tuning::default(), InputMode::Keyboard, Meadow::new(flowers, 1.5))
    }

    fn running_session(points: &[(f32, f32)]) -> GameSession {
        let mut session = session_with(points);
        assert!(session.start_level());
        session
    }

    #[test]
    fn starts_idle_with_full_lives() {
        let session = GameSession::new(Tuning::default(), InputMode::Touch);
        let state = session.state();
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.lives, 3);
        assert_eq!(state.target_nectar, 10);
        assert_eq!(state.time_remaining, 120.0);
        assert_eq!(state.input_mode, InputMode::Touch);
        assert_eq!(session.input.mode(), InputMode::Touch);
    }

    #[test]
    fn idle_is_frozen() {
        let mut session = session_with(&[(0.0, 0.0)]);
        let before = session.bee().clone();
        let input = InputVector { thrust: 1.0, turn: 1.0, vertical: 1, collect: true };
        assert_eq!(session.tick(1.0, &input), None);
        assert_eq!(session.bee(), &before);
        assert_eq!(session.state().time_remaining, 120.0);
        assert_eq!(session.state().nectar_collected, 0);
        assert_eq!(session.meadow().remaining(), 13);
    }

    #[test]
    fn start_while_running_is_a_noop() {
        let mut session = running_session(&[(0.0, 0.0)]);
        session.tick(1.0, &collect());
        assert!(!session.start_level());
        assert_eq!(session.state().nectar_collected, 1);
        assert_abs_diff_eq!(session.state().time_remaining, 119.0, epsilon = 1e-4);
    }

    #[test]
    fn three_flowers_in_range_are_all_collected() {
        let mut session = running_session(&[(0.5, 0.0), (-0.5, 0.0), (0.0, 0.5)]);
        assert_eq!(session.tick(DT, &collect()), None);
        assert_eq!(session.state().nectar_collected, 3);
        assert_eq!(session.state().phase, Phase::Running);
        assert_eq!(session.meadow().remaining(), 12);

        // Same spot again: nothing left to count
        session.tick(DT, &collect());
        assert_eq!(session.state().nectar_collected, 3);
    }

    #[test]
    fn reaching_target_completes_the_level() {
        let mut session = running_session(&[(0.5, 0.0), (-0.5, 0.0)]);
        session.state.nectar_collected = 9;
        assert_eq!(session.tick(DT, &collect()), Some(Phase::LevelComplete));
        assert_eq!(session.state().nectar_collected, 10);
        // The second flower in range was left alone
        assert_eq!(session.meadow().remaining(), 13);
        // Completing does not spend the clock for that tick
        assert_eq!(session.state().time_remaining, 120.0);
    }

    #[test]
    fn completion_freezes_the_level() {
        let mut session = running_session(&[(0.5, 0.0)]);
        session.state.nectar_collected = 9;
        session.tick(DT, &collect());
        let bee = session.bee().clone();
        let thrust = InputVector { thrust: 1.0, ..InputVector::default() };
        assert_eq!(session.tick(1.0, &thrust), None);
        assert_eq!(session.bee(), &bee);
        assert_eq!(session.state().phase, Phase::LevelComplete);
    }

    #[test]
    fn timeout_with_lives_left_fails_the_level() {
        let mut session = running_session(&[]);
        session.state.time_remaining = 0.5;
        assert_eq!(session.tick(0.25, &InputVector::default()), None);
        assert_eq!(session.tick(0.25, &InputVector::default()), Some(Phase::LevelFailed));
        assert_eq!(session.state().time_remaining, 0.0);
        assert_eq!(session.state().lives, 2);
    }

    #[test]
    fn last_life_timeout_is_game_over_and_refills_lives() {
        let mut session = running_session(&[]);
        session.state.time_remaining = 0.016;
        session.state.lives = 1;
        assert_eq!(session.tick(0.02, &InputVector::default()), Some(Phase::GameOver));
        assert_eq!(session.state().time_remaining, 0.0);
        assert_eq!(session.state().lives, 3);
    }

    #[test]
    fn restart_resets_the_level() {
        let mut session = running_session(&[(0.5, 0.0), (-0.5, 0.0)]);
        session.tick(DT, &collect());
        let thrust = InputVector { thrust: 1.0, turn: 0.5, vertical: 1, collect: false };
        session.tick(2.0, &thrust);
        session.state.time_remaining = 0.01;
        assert_eq!(session.tick(DT, &InputVector::default()), Some(Phase::LevelFailed));

        assert!(session.start_level());
        let state = session.state();
        assert_eq!(state.phase, Phase::Running);
        assert_eq!(state.nectar_collected, 0);
        assert_eq!(state.time_remaining, 120.0);
        assert_eq!(state.lives, 2);
        assert_eq!(session.meadow().remaining(), 14);
        assert_eq!(session.bee().position, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(session.bee().heading, 0.0);
    }

    #[test]
    fn step_starts_on_space_and_flies() {
        let mut session = session_with(&[]);
        let joystick = JoystickLayout::new(&TouchTuning::default(), 600.0);

        let mut queue = InputQueue::new();
        queue.push(InputEvent::KeyDown { key_code: 32 });
        let report = session.step(DT, &queue, &joystick);
        assert!(report.started);
        assert_eq!(report.transition, None);
        assert!(session.state().running());

        let mut queue = InputQueue::new();
        queue.push(InputEvent::KeyDown { key_code: 87 });
        session.step(0.5, &queue, &joystick);
        // Held key persists into steps that carry no events
        session.step(0.5, &InputQueue::new(), &joystick);
        assert_abs_diff_eq!(session.bee().position.z, 9.0, epsilon = 1e-4);
    }

    #[test]
    fn keys_after_the_start_press_are_held() {
        let mut session = session_with(&[]);
        let joystick = JoystickLayout::new(&TouchTuning::default(), 600.0);

        let mut queue = InputQueue::new();
        queue.push(InputEvent::KeyDown { key_code: 87 });
        queue.push(InputEvent::KeyDown { key_code: 32 });
        queue.push(InputEvent::KeyDown { key_code: 69 });
        let report = session.step(0.5, &queue, &joystick);
        assert!(report.started);
        // W came before the start and is dropped; E came after and climbs
        assert_eq!(session.bee().position.z, 0.0);
        assert_abs_diff_eq!(session.bee().position.y, 2.0 + 0.5 * 9.0 * 0.4, epsilon = 1e-4);
    }

    #[test]
    fn joystick_after_the_start_tap_is_live() {
        let mut session = GameSession::new(Tuning::default(), InputMode::Touch);
        let joystick = JoystickLayout::new(&TouchTuning::default(), 600.0);

        let mut queue = InputQueue::new();
        queue.push(InputEvent::PointerDown { x: 400.0, y: 100.0 });
        // Joystick centre is (80, 520); push the knob fully up
        queue.push(InputEvent::PointerDown { x: 80.0, y: 520.0 });
        queue.push(InputEvent::PointerMove { x: 80.0, y: 480.0 });
        let report = session.step(0.5, &queue, &joystick);
        assert!(report.started);
        assert_abs_diff_eq!(session.bee().position.z, 4.5, epsilon = 1e-4);
    }

    #[test]
    fn retune_rebuilds_only_when_not_running() {
        let mut session = running_session(&[]);
        let mut tuning = Tuning::default();
        tuning.level.duration = 30.0;
        assert!(matches!(session.retune(tuning.clone()), Err(TuningError::LevelRunning)));

        session.state.time_remaining = 0.01;
        session.tick(DT, &InputVector::default());
        session.retune(tuning).unwrap();
        assert_eq!(session.state().phase, Phase::Idle);
        assert_eq!(session.state().time_remaining, 30.0);
        assert_eq!(session.state().lives, 3);
        assert_eq!(session.meadow().flowers().len(), 15);
    }

    #[test]
    fn retune_rejects_invalid_tuning() {
        let mut session = GameSession::new(Tuning::default(), InputMode::Keyboard);
        let mut tuning = Tuning::default();
        tuning.level.target_nectar = 0;
        assert!(matches!(session.retune(tuning), Err(TuningError::ZeroTarget)));
        assert_eq!(session.tuning(), &Tuning::default());
    }
}
