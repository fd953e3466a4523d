/// Fixed timestep accumulator.
/// Turns variable host frame deltas into a whole number of fixed simulation steps.
pub struct FixedTimestep {
    /// The fixed delta time per step.
    dt: f32,
    /// Upper bound on steps per frame; time beyond it is dropped.
    max_steps: u32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
    /// Total simulated time in seconds.
    elapsed: f64,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self::with_max_steps(dt, 10)
    }

    pub fn with_max_steps(dt: f32, max_steps: u32) -> Self {
        Self {
            dt,
            max_steps: max_steps.max(1),
            accumulator: 0.0,
            elapsed: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    /// Negative or non-finite frame deltas count as zero.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        let frame_dt = if frame_dt.is_finite() { frame_dt.max(0.0) } else { 0.0 };
        self.accumulator += frame_dt;
        // Cap to prevent spiral of death after a stalled tab
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        self.elapsed += steps as f64 * self.dt as f64;
        steps
    }

    /// Interpolation alpha for rendering between steps (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Total simulated seconds since construction.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0 / 60.0), 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(0.008), 0);
        assert_eq!(ts.accumulate(0.010), 1);
    }

    #[test]
    fn caps_at_max_steps() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0), 10);

        let mut ts = FixedTimestep::with_max_steps(0.25, 3);
        assert_eq!(ts.accumulate(5.0), 3);
        // Excess was dropped, not carried over
        assert_eq!(ts.accumulate(0.0), 0);
    }

    #[test]
    fn bad_frame_deltas_are_ignored() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(-1.0), 0);
        assert_eq!(ts.accumulate(f32::NAN), 0);
        assert_eq!(ts.accumulate(f32::INFINITY), 0);
        assert_eq!(ts.alpha(), 0.0);
    }

    #[test]
    fn elapsed_counts_simulated_time() {
        let mut ts = FixedTimestep::new(0.25);
        ts.accumulate(0.6);
        approx::assert_abs_diff_eq!(ts.elapsed(), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn alpha_is_between_zero_and_one() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        ts.accumulate(0.008);
        let a = ts.alpha();
        assert!((0.0..=1.0).contains(&a), "alpha was {}", a);
    }
}
