use glam::{Quat, Vec3};

use crate::input::InputVector;
use crate::tuning::BeeTuning;

/// Wing hinge offsets in bee-local space (y up, z forward).
pub const LEFT_WING_OFFSET: Vec3 = Vec3::new(-0.5, 0.3, 0.0);
pub const RIGHT_WING_OFFSET: Vec3 = Vec3::new(0.5, 0.3, 0.0);

/// Axis-aligned box the bee may not leave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl WorldBounds {
    pub fn from_tuning(tuning: &BeeTuning) -> Self {
        Self {
            min: Vec3::from_array(tuning.bounds_min),
            max: Vec3::from_array(tuning.bounds_max),
        }
    }

    pub fn clamp(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bee {
    pub position: Vec3,
    /// Yaw around +Y; 0 faces +Z.
    pub heading: f32,
    flap_phase: f32,
}

impl Bee {
    pub fn spawn(tuning: &BeeTuning) -> Self {
        Self {
            position: tuning.spawn_point(),
            heading: tuning.spawn_heading,
            flap_phase: 0.0,
        }
    }

    /// Back to the spawn pose. The wing phase keeps running.
    pub fn reset(&mut self, tuning: &BeeTuning) {
        self.position = tuning.spawn_point();
        self.heading = tuning.spawn_heading;
    }

    /// Unit facing vector on the ground plane.
    pub fn forward(&self) -> Vec3 {
        let (sin, cos) = self.heading.sin_cos();
        Vec3::new(sin, 0.0, cos)
    }

    /// Integrate one step of movement, then clamp into `bounds`.
    pub fn advance(&mut self, input: &InputVector, dt: f32, tuning: &BeeTuning, bounds: &WorldBounds) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let thrust = input.thrust.clamp(-1.0, 1.0);
        let turn = input.turn.clamp(-1.0, 1.0);
        let vertical = input.vertical.signum() as f32;

        self.heading += turn * tuning.turn_speed * dt;

        let step = self.forward() * thrust * tuning.move_speed * dt
            + Vec3::Y * vertical * tuning.move_speed * tuning.vertical_factor * dt;
        self.position = bounds.clamp(self.position + step);
    }

    /// Presentational only.
    pub fn flap(&mut self, dt: f32, tuning: &BeeTuning) {
        if dt.is_finite() && dt > 0.0 {
            self.flap_phase = (self.flap_phase + dt * tuning.flap_speed) % std::f32::consts::TAU;
        }
    }

    /// (left, right) wing roll angles. The wings mirror each other.
    pub fn wing_tilts(&self, tuning: &BeeTuning) -> (f32, f32) {
        let tilt = tuning.wing_base_angle + self.flap_phase.sin() * tuning.flap_amplitude;
        (tilt, -tilt)
    }

    /// Bee-local offset to world space.
    pub fn local_to_world(&self, offset: Vec3) -> Vec3 {
        self.position + Quat::from_rotation_y(self.heading) * offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    fn setup() -> (Bee, BeeTuning, WorldBounds) {
        let tuning = BeeTuning::default();
        let bounds = WorldBounds::from_tuning(&tuning);
        (Bee::spawn(&tuning), tuning, bounds)
    }

    fn thrust(thrust: f32) -> InputVector {
        InputVector { thrust, ..InputVector::default() }
    }

    #[test]
    fn spawns_at_spawn_pose() {
        let (bee, _, _) = setup();
        assert_eq!(bee.position, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(bee.heading, 0.0);
        assert_eq!(bee.forward(), Vec3::Z);
    }

    #[test]
    fn forward_moves_along_heading() {
        let (mut bee, tuning, bounds) = setup();
        bee.advance(&thrust(1.0), 1.0, &tuning, &bounds);
        assert_abs_diff_eq!(bee.position.z, 9.0, epsilon = 1e-5);
        assert_abs_diff_eq!(bee.position.x, 0.0, epsilon = 1e-5);

        bee.heading = FRAC_PI_2;
        bee.advance(&thrust(-0.5), 1.0, &tuning, &bounds);
        assert_abs_diff_eq!(bee.position.x, -4.5, epsilon = 1e-5);
        assert_abs_diff_eq!(bee.position.z, 9.0, epsilon = 1e-5);
    }

    #[test]
    fn turning_left_increases_heading() {
        let (mut bee, tuning, bounds) = setup();
        let input = InputVector { turn: 1.0, ..InputVector::default() };
        bee.advance(&input, 0.5, &tuning, &bounds);
        assert_abs_diff_eq!(bee.heading, 1.5, epsilon = 1e-6);
        // Turning alone never moves the bee
        assert_eq!(bee.position, tuning.spawn_point());
    }

    #[test]
    fn vertical_uses_reduced_speed() {
        let (mut bee, tuning, bounds) = setup();
        let input = InputVector { vertical: 1, ..InputVector::default() };
        bee.advance(&input, 1.0, &tuning, &bounds);
        assert_abs_diff_eq!(bee.position.y, 2.0 + 9.0 * 0.4, epsilon = 1e-5);
    }

    #[test]
    fn position_is_clamped_to_bounds() {
        let (mut bee, tuning, bounds) = setup();
        let input = InputVector { thrust: 1.0, turn: 0.3, vertical: -1, collect: false };
        for _ in 0..200 {
            bee.advance(&input, 0.25, &tuning, &bounds);
            assert!(bounds.contains(bee.position), "escaped: {:?}", bee.position);
        }
        assert_eq!(bee.position.y, 1.0);

        // One huge step still lands inside
        bee.advance(&thrust(1.0), 1.0e6, &tuning, &bounds);
        assert!(bounds.contains(bee.position));
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        let (mut bee, tuning, bounds) = setup();
        bee.advance(&thrust(10.0), 1.0, &tuning, &bounds);
        assert_abs_diff_eq!(bee.position.z, 9.0, epsilon = 1e-5);
    }

    #[test]
    fn bad_dt_does_not_move() {
        let (mut bee, tuning, bounds) = setup();
        bee.advance(&thrust(1.0), -1.0, &tuning, &bounds);
        bee.advance(&thrust(1.0), f32::NAN, &tuning, &bounds);
        assert_eq!(bee.position, tuning.spawn_point());
    }

    #[test]
    fn reset_restores_pose() {
        let (mut bee, tuning, bounds) = setup();
        bee.advance(&InputVector { thrust: 1.0, turn: 1.0, vertical: 1, collect: false }, 1.0, &tuning, &bounds);
        bee.reset(&tuning);
        assert_eq!(bee, Bee { flap_phase: bee.flap_phase, ..Bee::spawn(&tuning) });
    }

    #[test]
    fn wings_mirror_around_base_angle() {
        let (mut bee, tuning, _) = setup();
        let (left, right) = bee.wing_tilts(&tuning);
        assert_abs_diff_eq!(left, FRAC_PI_4, epsilon = 1e-6);
        assert_abs_diff_eq!(right, -FRAC_PI_4, epsilon = 1e-6);

        // Quarter cycle: sin(phase) = 1
        bee.flap(FRAC_PI_2 / tuning.flap_speed, &tuning);
        let (left, right) = bee.wing_tilts(&tuning);
        assert_abs_diff_eq!(left, FRAC_PI_4 + 0.3, epsilon = 1e-5);
        assert_abs_diff_eq!(right, -(FRAC_PI_4 + 0.3), epsilon = 1e-5);
    }

    #[test]
    fn wing_offsets_follow_heading() {
        let (mut bee, _, _) = setup();
        bee.heading = FRAC_PI_2;
        // A quarter turn carries local +X onto world -Z
        let right = bee.local_to_world(RIGHT_WING_OFFSET);
        assert_abs_diff_eq!(right.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(right.y, 2.3, epsilon = 1e-5);
        assert_abs_diff_eq!(right.z, -0.5, epsilon = 1e-5);
    }
}
