//! Orbit math: pure functions of time, f64 throughout.
//!
//! All orbits lie in the flat y = 0 plane; angles are radians measured
//! from +x towards +z.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Offset on a circle of `radius` at angle `angular_speed * time + phase`.
pub fn circular_offset(radius: f64, angular_speed: f64, phase: f64, time: f64) -> DVec3 {
    let angle = angular_speed * time + phase;
    DVec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
}

/// Self-rotation angle after `time` seconds at `rate` rad/s.
/// Independent of orbital phase.
pub fn spin_angle(rate: f64, time: f64) -> f64 {
    rate * time
}

/// Solve Kepler's equation: E - e·sin(E) = M
/// Using Newton-Raphson iteration.
/// `mean_anomaly` in radians, returns eccentric anomaly in radians.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let mut ea = if eccentricity > 0.8 { std::f64::consts::PI } else { mean_anomaly };
    for _ in 0..15 {
        let delta = ea - eccentricity * ea.sin() - mean_anomaly;
        let derivative = 1.0 - eccentricity * ea.cos();
        ea -= delta / derivative;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ea
}

/// Elliptical orbit around the origin, parameterized for display rather
/// than astronomy: the period is in simulation seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeplerOrbit {
    pub semi_major_axis: f64,
    /// In [0, 1).
    pub eccentricity: f64,
    /// Seconds per revolution.
    pub period: f64,
    /// Angle of periapsis from +x.
    pub periapsis_angle: f64,
    /// Mean anomaly at time 0.
    pub epoch_anomaly: f64,
}

impl KeplerOrbit {
    pub fn mean_motion(&self) -> f64 {
        std::f64::consts::TAU / self.period
    }

    /// Whether the elements describe a closed, finite orbit.
    pub fn is_valid(&self) -> bool {
        self.semi_major_axis.is_finite()
            && self.semi_major_axis > 0.0
            && (0.0..1.0).contains(&self.eccentricity)
            && self.period.is_finite()
            && self.period > 0.0
            && self.periapsis_angle.is_finite()
            && self.epoch_anomaly.is_finite()
    }

    pub fn position(&self, time: f64) -> DVec3 {
        let e = self.eccentricity;
        let m = (self.epoch_anomaly + self.mean_motion() * time).rem_euclid(std::f64::consts::TAU);
        let ea = solve_kepler(m, e);

        let true_anomaly = 2.0
            * ((1.0 + e).sqrt() * (ea / 2.0).sin())
                .atan2((1.0 - e).sqrt() * (ea / 2.0).cos());
        let r = self.semi_major_axis * (1.0 - e * ea.cos());

        let angle = true_anomaly + self.periapsis_angle;
        DVec3::new(r * angle.cos(), 0.0, r * angle.sin())
    }

    pub fn periapsis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    pub fn apoapsis(&self) -> f64 {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn circle_starts_on_x_axis() {
        let p = circular_offset(10.0, 1.0, 0.0, 0.0);
        assert_relative_eq!(p.x, 10.0);
        assert_eq!(p.y, 0.0);
        assert_relative_eq!(p.z, 0.0);
    }

    #[test]
    fn quarter_turn_lands_on_z_axis() {
        let p = circular_offset(10.0, 1.0, 0.0, FRAC_PI_2);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_speed_is_well_defined() {
        let p = circular_offset(5.0, 0.0, PI, 1.0e6);
        assert_relative_eq!(p.x, -5.0, epsilon = 1e-12);
        assert_relative_eq!(p.length(), 5.0);
    }

    #[test]
    fn kepler_circular_orbit() {
        // For e=0, eccentric anomaly = mean anomaly
        let ea = solve_kepler(1.0, 0.0);
        assert!((ea - 1.0).abs() < 1e-10);
    }

    #[test]
    fn kepler_converges_for_eccentric_orbit() {
        let m = 1.5;
        let e = 0.6;
        let ea = solve_kepler(m, e);
        let residual = ea - e * ea.sin() - m;
        assert!(residual.abs() < 1e-12, "residual = {residual}");
    }

    #[test]
    fn ellipse_distance_stays_between_apsides() {
        let orbit = KeplerOrbit {
            semi_major_axis: 60.0,
            eccentricity: 0.7,
            period: 90.0,
            periapsis_angle: 0.4,
            epoch_anomaly: 0.0,
        };
        assert!(orbit.is_valid());
        assert_relative_eq!(orbit.position(0.0).length(), orbit.periapsis(), epsilon = 1e-9);
        assert_relative_eq!(orbit.position(45.0).length(), orbit.apoapsis(), epsilon = 1e-6);
        for i in 0..50 {
            let p = orbit.position(i as f64 * 1.7);
            let d = p.length();
            assert!(d >= orbit.periapsis() - 1e-9 && d <= orbit.apoapsis() + 1e-9, "d = {d}");
            assert_eq!(p.y, 0.0);
        }
    }

    #[test]
    fn open_orbits_are_invalid() {
        let orbit = KeplerOrbit {
            semi_major_axis: 60.0,
            eccentricity: 1.0,
            period: 90.0,
            periapsis_angle: 0.0,
            epoch_anomaly: 0.0,
        };
        assert!(!orbit.is_valid());
    }
}
