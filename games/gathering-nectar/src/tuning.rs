//! Level tuning: every gameplay constant, loadable from host-supplied JSON.

use std::f32::consts::FRAC_PI_4;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bee::WorldBounds;
use crate::game::MAX_INSTANCES;
use crate::scenery::PROPS;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("world bounds are empty on at least one axis")]
    EmptyBounds,

    #[error("bee spawn point lies outside the world bounds")]
    SpawnOutOfBounds,

    #[error("starting lives must be between 1 and {max}, got {got}", max = MAX_LIVES)]
    Lives { got: u32 },

    #[error("target nectar must be at least 1")]
    ZeroTarget,

    #[error("target nectar {target} exceeds the {available} units the meadow holds")]
    Unreachable { target: u32, available: u32 },

    #[error("meadow.flower_count must be at most {max}, got {got}", max = MAX_FLOWERS)]
    TooManyFlowers { got: u32 },

    #[error("tuning cannot change while a level is running")]
    LevelRunning,
}

/// Upper bound on lives.
pub const MAX_LIVES: u32 = 3;

/// Flowers share the instance buffer with the scenery, the bee and its two wings.
pub const MAX_FLOWERS: u32 = (MAX_INSTANCES - PROPS.len() - 3) as u32;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub level: LevelTuning,
    pub bee: BeeTuning,
    pub meadow: MeadowTuning,
    pub touch: TouchTuning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTuning {
    /// Countdown length in seconds.
    pub duration: f32,
    pub target_nectar: u32,
    pub starting_lives: u32,
}

impl Default for LevelTuning {
    fn default() -> Self {
        Self {
            duration: 120.0,
            target_nectar: 10,
            starting_lives: MAX_LIVES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeeTuning {
    /// Forward/backward speed in world units per second.
    pub move_speed: f32,
    /// Turn rate in radians per second.
    pub turn_speed: f32,
    /// Climb/descent speed as a fraction of `move_speed`.
    pub vertical_factor: f32,
    pub spawn: [f32; 3],
    pub spawn_heading: f32,
    pub bounds_min: [f32; 3],
    pub bounds_max: [f32; 3],
    /// Wing flap phase advance in radians per second.
    pub flap_speed: f32,
    pub flap_amplitude: f32,
    /// Resting wing tilt in radians.
    pub wing_base_angle: f32,
}

impl Default for BeeTuning {
    fn default() -> Self {
        Self {
            move_speed: 9.0,
            turn_speed: 3.0,
            vertical_factor: 0.4,
            spawn: [0.0, 2.0, 0.0],
            spawn_heading: 0.0,
            bounds_min: [-45.0, 1.0, -45.0],
            bounds_max: [45.0, 15.0, 45.0],
            flap_speed: 12.0,
            flap_amplitude: 0.3,
            wing_base_angle: FRAC_PI_4,
        }
    }
}

impl BeeTuning {
    pub fn spawn_point(&self) -> Vec3 {
        Vec3::from_array(self.spawn)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeadowTuning {
    pub flower_count: u32,
    /// Flowers are scattered in x, z ∈ (-extent, extent).
    pub scatter_extent: f32,
    pub collection_radius: f32,
    pub nectar_amount: u32,
    pub colour_variants: u32,
    pub seed: u64,
}

impl Default for MeadowTuning {
    fn default() -> Self {
        Self {
            flower_count: 15,
            scatter_extent: 40.0,
            collection_radius: 1.5,
            nectar_amount: 1,
            colour_variants: 5,
            seed: 0x5EED_BEE5,
        }
    }
}

/// On-screen joystick geometry in CSS pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchTuning {
    /// Gap between the joystick container and the bottom-left viewport corner.
    pub joystick_margin: f32,
    /// Side of the joystick container.
    pub joystick_size: f32,
    /// How far the knob may travel from the centre.
    pub knob_travel: f32,
}

impl Default for TouchTuning {
    fn default() -> Self {
        Self {
            joystick_margin: 20.0,
            joystick_size: 120.0,
            knob_travel: 35.0,
        }
    }
}

impl Tuning {
    /// Parse and validate. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("level.duration", self.level.duration),
            ("bee.move_speed", self.bee.move_speed),
            ("bee.turn_speed", self.bee.turn_speed),
            ("bee.vertical_factor", self.bee.vertical_factor),
            ("meadow.scatter_extent", self.meadow.scatter_extent),
            ("meadow.collection_radius", self.meadow.collection_radius),
            ("touch.joystick_size", self.touch.joystick_size),
            ("touch.knob_travel", self.touch.knob_travel),
        ];
        for (field, value) in positive {
            // Written this way round so NaN fails too
            if !(value > 0.0) {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        let bounds = WorldBounds::from_tuning(&self.bee);
        if !bounds.min.cmplt(bounds.max).all() {
            return Err(TuningError::EmptyBounds);
        }
        if !bounds.contains(self.bee.spawn_point()) {
            return Err(TuningError::SpawnOutOfBounds);
        }

        if !(1..=MAX_LIVES).contains(&self.level.starting_lives) {
            return Err(TuningError::Lives { got: self.level.starting_lives });
        }
        if self.meadow.flower_count > MAX_FLOWERS {
            return Err(TuningError::TooManyFlowers { got: self.meadow.flower_count });
        }
        if self.level.target_nectar == 0 {
            return Err(TuningError::ZeroTarget);
        }
        let available = self.meadow.flower_count.saturating_mul(self.meadow.nectar_amount);
        if self.level.target_nectar > available {
            return Err(TuningError::Unreachable {
                target: self.level.target_nectar,
                available,
            });
        }
        Ok(())
    }
}
