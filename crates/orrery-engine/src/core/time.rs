use crate::api::error::{OrreryError, OrreryResult};

/// Simulation clock driven by the render loop's frame deltas.
/// Elapsed time never decreases.
#[derive(Debug, Clone, PartialEq)]
pub struct SimClock {
    /// Simulated seconds since start.
    elapsed: f64,
    /// Multiplier applied to every frame delta.
    time_scale: f64,
    /// Longest real frame delta accepted in one advance (tab switches, stalls).
    max_frame_dt: f64,
    paused: bool,
}

impl SimClock {
    pub fn new(time_scale: f64, max_frame_dt: f64) -> Self {
        Self {
            elapsed: 0.0,
            time_scale,
            max_frame_dt,
            paused: false,
        }
    }

    /// Add one frame's real delta. Returns the new elapsed time.
    pub fn advance(&mut self, frame_dt: f64) -> OrreryResult<f64> {
        if !frame_dt.is_finite() || frame_dt < 0.0 {
            return Err(OrreryError::InvalidTime(frame_dt));
        }
        if !self.paused {
            self.elapsed += frame_dt.min(self.max_frame_dt) * self.time_scale;
        }
        Ok(self.elapsed)
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Set the speed multiplier. 0 freezes motion without pausing.
    pub fn set_time_scale(&mut self, scale: f64) -> OrreryResult<()> {
        if !scale.is_finite() || scale < 0.0 {
            return Err(OrreryError::InvalidTime(scale));
        }
        self.time_scale = scale;
        Ok(())
    }

    pub fn max_frame_dt(&self) -> f64 {
        self.max_frame_dt
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Returns the new paused state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(1.0, 0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn advances_by_frame_delta() {
        let mut clock = SimClock::default();
        clock.advance(1.0 / 60.0).unwrap();
        clock.advance(1.0 / 60.0).unwrap();
        assert_relative_eq!(clock.elapsed(), 2.0 / 60.0);
    }

    #[test]
    fn long_frames_are_capped() {
        let mut clock = SimClock::new(1.0, 0.1);
        let t = clock.advance(5.0).unwrap();
        assert_relative_eq!(t, 0.1);
    }

    #[test]
    fn scale_multiplies_delta() {
        let mut clock = SimClock::default();
        clock.set_time_scale(4.0).unwrap();
        assert_relative_eq!(clock.advance(0.05).unwrap(), 0.2);
        assert!(clock.set_time_scale(-1.0).is_err());
        assert_eq!(clock.time_scale(), 4.0);
    }

    #[test]
    fn paused_clock_holds_time() {
        let mut clock = SimClock::default();
        clock.advance(0.05).unwrap();
        assert!(clock.toggle_pause());
        assert_relative_eq!(clock.advance(0.05).unwrap(), 0.05);
        clock.resume();
        assert_relative_eq!(clock.advance(0.05).unwrap(), 0.1);
    }

    #[test]
    fn rejects_negative_and_nan_deltas() {
        let mut clock = SimClock::default();
        assert!(matches!(clock.advance(-0.01), Err(OrreryError::InvalidTime(_))));
        assert!(clock.advance(f64::NAN).is_err());
        assert_eq!(clock.elapsed(), 0.0);
    }
}
