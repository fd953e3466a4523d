use wasm_bindgen::prelude::*;
use meadow_engine::*;

mod bee;
mod flowers;
mod game;
mod hud;
mod input;
mod scenery;
mod session;
mod tuning;
use game::NectarGame;

meadow_web::export_game!(NectarGame, "gathering-nectar");

/// Current HUD text and overlay as JSON. Poll `get_hud_revision` to skip unchanged frames.
#[wasm_bindgen]
pub fn get_hud_json() -> String {
    with_runner(|r| r.game().hud_json().to_string())
}

#[wasm_bindgen]
pub fn get_hud_revision() -> u32 {
    with_runner(|r| r.game().hud_revision())
}
