//! HUD text and overlays, published to the host as JSON.

use serde::Serialize;

use crate::input::InputMode;
use crate::session::{GameState, Phase};
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub title: String,
    pub body: String,
}

/// Everything the HUD collaborator shows for one state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudView {
    pub nectar: String,
    pub time: String,
    pub lives: String,
    /// Shown whenever no level is running.
    pub overlay: Option<Overlay>,
}

/// Whole seconds left as shown on screen (ceiling).
pub fn display_seconds(time_remaining: f32) -> u32 {
    time_remaining.max(0.0).ceil() as u32
}

impl HudView {
    pub fn new(state: &GameState, tuning: &Tuning) -> Self {
        Self {
            nectar: format!("Nectar: {}/{}", state.nectar_collected, state.target_nectar),
            time: format!("Time: {}s", display_seconds(state.time_remaining)),
            lives: format!("Lives: {}", state.lives),
            overlay: overlay(state, tuning),
        }
    }
}

fn prompt(mode: InputMode) -> &'static str {
    match mode {
        InputMode::Keyboard => "Press SPACE",
        InputMode::Touch => "Tap anywhere",
    }
}

fn controls(mode: InputMode) -> &'static str {
    match mode {
        InputMode::Keyboard => {
            "Controls:\n\
             W/↑ - Move Forward\n\
             S/↓ - Move Backward\n\
             A/← - Turn Left\n\
             D/→ - Turn Right\n\
             E - Fly Up\n\
             Q - Fly Down\n\
             Space - Collect Nectar (when near a flower)"
        }
        InputMode::Touch => {
            "Controls:\n\
             Left Joystick - Move the bee\n\
             Up/Down Buttons - Fly Up/Down\n\
             Yellow Button - Collect Nectar (when near a flower)"
        }
    }
}

fn overlay(state: &GameState, tuning: &Tuning) -> Option<Overlay> {
    let prompt = prompt(state.input_mode);
    let (title, body) = match state.phase {
        Phase::Running => return None,
        Phase::Idle => (
            "Level 1: Gathering Nectar",
            format!(
                "As a worker bee, your first mission is to gather nectar for the young ones. \
                 Collect nectar from {} flowers before time runs out.\n\n{}\n\n{} to start!",
                state.target_nectar,
                controls(state.input_mode),
                prompt,
            ),
        ),
        Phase::LevelComplete => {
            let spent = (tuning.level.duration - state.time_remaining).max(0.0).floor() as u32;
            (
                "Level Complete!",
                format!(
                    "Congratulations! You've collected enough nectar for the young ones.\n\n\
                     You collected {} nectar in {} seconds.\n\n{} to restart!",
                    state.nectar_collected, spent, prompt,
                ),
            )
        }
        Phase::LevelFailed => (
            "Level Failed!",
            format!(
                "You didn't collect enough nectar in time!\n\n\
                 You collected {} out of {} nectar.\n\n\
                 Lives remaining: {}\n\n{} to try again!",
                state.nectar_collected, state.target_nectar, state.lives, prompt,
            ),
        ),
        Phase::GameOver => (
            "Game Over!",
            format!(
                "You've run out of lives!\n\n\
                 You collected {} out of {} nectar.\n\n{} to try again!",
                state.nectar_collected, state.target_nectar, prompt,
            ),
        ),
    };
    Some(Overlay { title: title.to_string(), body })
}

#[derive(Serialize)]
struct HudDocument<'a> {
    revision: u32,
    #[serde(flatten)]
    view: &'a HudView,
}

/// Caches the current view and its JSON, bumping a revision on every change.
#[derive(Debug, Default)]
pub struct Hud {
    view: Option<HudView>,
    revision: u32,
    json: String,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from the current state. Returns true if anything visible changed.
    pub fn refresh(&mut self, state: &GameState, tuning: &Tuning) -> bool {
        let view = HudView::new(state, tuning);
        if self.view.as_ref() == Some(&view) {
            return false;
        }
        self.revision = self.revision.wrapping_add(1);
        let document = HudDocument { revision: self.revision, view: &view };
        match serde_json::to_string(&document) {
            Ok(json) => self.json = json,
            Err(err) => log::warn!("hud: failed to encode view: {}", err),
        }
        self.view = Some(view);
        true
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn json(&self) -> &str {
        &self.json
    }
}
