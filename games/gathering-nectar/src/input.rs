//! Keyboard and touch controls folded into one per-frame `InputVector`.

use glam::Vec2;
use meadow_engine::InputEvent;

use crate::tuning::TouchTuning;

// DOM keyCode values
const KEY_SPACE: u32 = 32;
const KEY_LEFT: u32 = 37;
const KEY_UP: u32 = 38;
const KEY_RIGHT: u32 = 39;
const KEY_DOWN: u32 = 40;
const KEY_A: u32 = 65;
const KEY_D: u32 = 68;
const KEY_E: u32 = 69;
const KEY_Q: u32 = 81;
const KEY_S: u32 = 83;
const KEY_W: u32 = 87;

// Custom event kinds sent by the host's touch buttons (a = 1 pressed, 0 released)
pub const CUSTOM_BUTTON_UP: u32 = 10;
pub const CUSTOM_BUTTON_DOWN: u32 = 11;
pub const CUSTOM_BUTTON_COLLECT: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Keyboard,
    Touch,
}

/// Discrete control a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    Up,
    Down,
    Collect,
}

impl Action {
    const COUNT: usize = 7;

    pub fn from_key_code(key_code: u32) -> Option<Self> {
        match key_code {
            KEY_W | KEY_UP => Some(Action::Forward),
            KEY_S | KEY_DOWN => Some(Action::Backward),
            KEY_A | KEY_LEFT => Some(Action::TurnLeft),
            KEY_D | KEY_RIGHT => Some(Action::TurnRight),
            KEY_E => Some(Action::Up),
            KEY_Q => Some(Action::Down),
            KEY_SPACE => Some(Action::Collect),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Movement intent for one frame. Rebuilt from device state every step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputVector {
    /// Forward (+) / backward (-), in [-1, 1].
    pub thrust: f32,
    /// Left (+) / right (-), in [-1, 1].
    pub turn: f32,
    /// -1, 0 or 1.
    pub vertical: i8,
    pub collect: bool,
}

fn axis(positive: bool, negative: bool) -> i8 {
    positive as i8 - negative as i8
}

#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: [bool; Action::COUNT],
}

impl KeyboardState {
    pub fn is_held(&self, action: Action) -> bool {
        self.held[action.index()]
    }

    /// Returns true when this is the start trigger: a fresh Space press while not running.
    fn key_down(&mut self, key_code: u32, running: bool) -> bool {
        let Some(action) = Action::from_key_code(key_code) else {
            return false;
        };
        let repeat = self.is_held(action);
        if running {
            self.held[action.index()] = true;
            false
        } else {
            action == Action::Collect && !repeat
        }
    }

    fn key_up(&mut self, key_code: u32) {
        if let Some(action) = Action::from_key_code(key_code) {
            self.held[action.index()] = false;
        }
    }

    pub fn vector(&self) -> InputVector {
        InputVector {
            thrust: axis(self.is_held(Action::Forward), self.is_held(Action::Backward)) as f32,
            turn: axis(self.is_held(Action::TurnLeft), self.is_held(Action::TurnRight)) as f32,
            vertical: axis(self.is_held(Action::Up), self.is_held(Action::Down)),
            collect: self.is_held(Action::Collect),
        }
    }
}

/// Where the joystick sits on screen for the current viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoystickLayout {
    pub centre: Vec2,
    pub half_size: f32,
    pub travel: f32,
}

impl JoystickLayout {
    /// The container is anchored to the bottom-left corner, so only the height matters.
    pub fn new(touch: &TouchTuning, viewport_height: f32) -> Self {
        let half_size = touch.joystick_size * 0.5;
        let inset = touch.joystick_margin + half_size;
        Self {
            centre: Vec2::new(inset, viewport_height - inset),
            half_size,
            travel: touch.knob_travel,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let d = (point - self.centre).abs();
        d.x <= self.half_size && d.y <= self.half_size
    }

    /// Pixel position to knob offset in the unit disk.
    pub fn normalize(&self, point: Vec2) -> Vec2 {
        (point - self.centre).clamp_length_max(self.travel) / self.travel
    }
}

#[derive(Debug, Clone, Default)]
pub struct TouchState {
    /// Knob offset in the unit disk, screen orientation (+y down).
    joystick: Vec2,
    dragging: bool,
    up: bool,
    down: bool,
    collect: bool,
}

impl TouchState {
    fn pointer_down(&mut self, point: Vec2, running: bool, layout: &JoystickLayout) -> bool {
        if !running {
            return true;
        }
        if layout.contains(point) {
            self.dragging = true;
            self.joystick = layout.normalize(point);
        }
        false
    }

    fn pointer_move(&mut self, point: Vec2, layout: &JoystickLayout) {
        if self.dragging {
            self.joystick = layout.normalize(point);
        }
    }

    fn pointer_up(&mut self) {
        self.dragging = false;
        self.joystick = Vec2::ZERO;
    }

    fn button(&mut self, kind: u32, pressed: bool, running: bool) -> bool {
        let slot = match kind {
            CUSTOM_BUTTON_UP => &mut self.up,
            CUSTOM_BUTTON_DOWN => &mut self.down,
            CUSTOM_BUTTON_COLLECT => &mut self.collect,
            _ => return false,
        };
        if !pressed {
            *slot = false;
            return false;
        }
        if running {
            *slot = true;
            false
        } else {
            true
        }
    }

    pub fn vector(&self) -> InputVector {
        InputVector {
            thrust: -self.joystick.y,
            turn: -self.joystick.x,
            vertical: axis(self.up, self.down),
            collect: self.collect,
        }
    }
}

/// Raw device state for the session's single input scheme.
#[derive(Debug, Clone)]
pub enum InputState {
    Keyboard(KeyboardState),
    Touch(TouchState),
}

impl InputState {
    pub fn new(mode: InputMode) -> Self {
        match mode {
            InputMode::Keyboard => InputState::Keyboard(KeyboardState::default()),
            InputMode::Touch => InputState::Touch(TouchState::default()),
        }
    }

    pub fn mode(&self) -> InputMode {
        match self {
            InputState::Keyboard(_) => InputMode::Keyboard,
            InputState::Touch(_) => InputMode::Touch,
        }
    }

    /// Fold one raw event into the device state. Events meant for the other
    /// scheme are ignored. Returns true when the event is a start trigger.
    pub fn apply(&mut self, event: &InputEvent, running: bool, layout: &JoystickLayout) -> bool {
        match (self, *event) {
            (InputState::Keyboard(keys), InputEvent::KeyDown { key_code }) => keys.key_down(key_code, running),
            (InputState::Keyboard(keys), InputEvent::KeyUp { key_code }) => {
                keys.key_up(key_code);
                false
            }
            (InputState::Touch(touch), InputEvent::PointerDown { x, y }) => {
                let point = Vec2::new(x, y);
                point.is_finite() && touch.pointer_down(point, running, layout)
            }
            (InputState::Touch(touch), InputEvent::PointerMove { x, y }) => {
                let point = Vec2::new(x, y);
                if point.is_finite() {
                    touch.pointer_move(point, layout);
                }
                false
            }
            (InputState::Touch(touch), InputEvent::PointerUp { .. }) => {
                touch.pointer_up();
                false
            }
            (InputState::Touch(touch), InputEvent::Custom { kind, a, .. }) => touch.button(kind, a >= 0.5, running),
            _ => false,
        }
    }

    pub fn vector(&self) -> InputVector {
        match self {
            InputState::Keyboard(keys) => keys.vector(),
            InputState::Touch(touch) => touch.vector(),
        }
    }
}
