use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::api::types::Rgb;
use crate::kinematics::orbit::KeplerOrbit;

/// A comet on an eccentric orbit around the star.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comet {
    pub orbit: KeplerOrbit,
    pub size: f64,
    /// Tail length at perihelion; shrinks with distance from the star.
    pub tail_length: f64,
    pub color: Rgb,
}

/// Where the comet is and where its tail points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CometPose {
    pub position: DVec3,
    /// Unit vector pointing away from the star.
    pub tail_direction: DVec3,
    pub tail_length: f64,
    pub size: f64,
    pub color: Rgb,
}

impl Comet {
    pub fn pose(&self, time: f64) -> CometPose {
        let position = self.orbit.position(time);
        let tail_direction = position.try_normalize().unwrap_or(DVec3::X);
        let tail_length = self.tail_length * self.orbit.periapsis() / position.length().max(1e-9);
        CometPose {
            position,
            tail_direction,
            tail_length,
            size: self.size,
            color: self.color,
        }
    }
}

impl Default for Comet {
    fn default() -> Self {
        Self {
            orbit: KeplerOrbit {
                semi_major_axis: 70.0,
                eccentricity: 0.75,
                period: 120.0,
                periapsis_angle: 2.2,
                epoch_anomaly: 0.0,
            },
            size: 0.3,
            tail_length: 6.0,
            color: Rgb::new(0xbf, 0xe8, 0xff),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn tail_points_away_from_star() {
        let comet = Comet::default();
        for i in 0..24 {
            let pose = comet.pose(i as f64 * 5.0);
            assert_relative_eq!(pose.tail_direction.length(), 1.0, epsilon = 1e-12);
            assert!(pose.tail_direction.dot(pose.position) > 0.0);
            assert_eq!(pose.position.y, 0.0);
        }
    }

    #[test]
    fn tail_is_longest_at_perihelion() {
        let comet = Comet::default();
        let near = comet.pose(0.0);
        let far = comet.pose(60.0);
        assert_relative_eq!(near.tail_length, comet.tail_length, epsilon = 1e-9);
        assert!(far.tail_length < near.tail_length);
    }
}
