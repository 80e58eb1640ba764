use glam::DVec3;

use crate::api::types::Rgb;
use crate::kinematics::orbit::{circular_offset, spin_angle};

/// Integer hash for deterministic belt layout (no RNG state, reproducible).
pub fn hash32(seed: u32) -> u32 {
    let mut n = seed;
    n = n.wrapping_mul(2654435761);
    n ^= n >> 16;
    n = n.wrapping_mul(2246822519);
    n ^= n >> 13;
    n
}

fn frac(h: u32) -> f64 {
    h as f64 / u32::MAX as f64
}

/// One belt rock on a circular orbit around the star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Asteroid {
    pub orbit_radius: f64,
    pub angular_speed: f64,
    pub phase: f64,
    pub spin_rate: f64,
    pub size: f64,
    pub tint: Rgb,
}

impl Asteroid {
    pub fn position(&self, time: f64) -> DVec3 {
        circular_offset(self.orbit_radius, self.angular_speed, self.phase, time)
    }

    pub fn spin(&self, time: f64) -> f64 {
        spin_angle(self.spin_rate, time)
    }
}

/// Shape of the belt: band, population and the Kepler anchor for speeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeltShape {
    pub count: usize,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub seed: u32,
    pub min_size: f64,
    pub max_size: f64,
    /// Orbit radius and speed that anchor the period/radius relation.
    pub reference_radius: f64,
    pub reference_speed: f64,
}

/// Angular speed at `radius`, scaled from the reference orbit by Kepler's third law.
pub fn kepler_speed(radius: f64, reference_radius: f64, reference_speed: f64) -> f64 {
    reference_speed * (reference_radius / radius).powf(1.5)
}

/// Generate the belt. Same shape, same rocks.
pub fn generate_belt(shape: &BeltShape) -> Vec<Asteroid> {
    (0..shape.count as u32)
        .map(|i| {
            let s = shape.seed.wrapping_add(i);
            let h1 = hash32(s.wrapping_mul(7).wrapping_add(31));
            let h2 = hash32(s.wrapping_mul(13).wrapping_add(97));
            let h3 = hash32(s.wrapping_mul(19).wrapping_add(151));
            let h4 = hash32(s.wrapping_mul(23).wrapping_add(211));
            let h5 = hash32(s.wrapping_mul(29).wrapping_add(277));

            let orbit_radius =
                shape.inner_radius + frac(h1) * (shape.outer_radius - shape.inner_radius);
            let grey = 0x70 + (frac(h4) * 0x40 as f64) as u8;

            Asteroid {
                orbit_radius,
                angular_speed: kepler_speed(orbit_radius, shape.reference_radius, shape.reference_speed),
                phase: frac(h2) * std::f64::consts::TAU,
                spin_rate: 0.2 + frac(h5) * 0.8,
                size: shape.min_size + frac(h3) * (shape.max_size - shape.min_size),
                tint: Rgb::new(grey, grey, grey.saturating_sub(0x08)),
            }
        })
        .collect()
}
