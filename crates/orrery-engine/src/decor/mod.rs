//! Decorative bodies: an asteroid belt and a comet.
//!
//! Pure functions of time like the catalog bodies, but not selectable and not
//! editable, so they live outside the registry and the parameter store.

pub mod belt;
pub mod comet;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::api::error::{OrreryError, OrreryResult};
use crate::api::types::Rgb;

pub use belt::{generate_belt, hash32, kepler_speed, Asteroid, BeltShape};
pub use comet::{Comet, CometPose};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorConfig {
    /// 0 disables the belt.
    pub asteroid_count: usize,
    pub belt_inner: f64,
    pub belt_outer: f64,
    pub belt_seed: u32,
    pub asteroid_min_size: f64,
    pub asteroid_max_size: f64,
    /// Reference orbit for belt speeds (Earth's defaults).
    pub reference_radius: f64,
    pub reference_speed: f64,
    pub comet: Option<Comet>,
}

impl Default for DecorConfig {
    fn default() -> Self {
        Self {
            asteroid_count: 120,
            belt_inner: 30.0,
            belt_outer: 36.0,
            belt_seed: 31,
            asteroid_min_size: 0.05,
            asteroid_max_size: 0.2,
            reference_radius: 20.0,
            reference_speed: 0.15,
            comet: Some(Comet::default()),
        }
    }
}

impl DecorConfig {
    pub fn validate(&self) -> OrreryResult<()> {
        let invalid = |what: &str| Err(OrreryError::InvalidConfig(format!("decor: {what}")));
        if !(self.belt_inner > 0.0 && self.belt_outer >= self.belt_inner && self.belt_outer.is_finite()) {
            return invalid("belt radii must satisfy 0 < inner <= outer");
        }
        if !(self.asteroid_min_size > 0.0 && self.asteroid_max_size >= self.asteroid_min_size) {
            return invalid("asteroid sizes must satisfy 0 < min <= max");
        }
        if !(self.reference_radius > 0.0 && self.reference_speed.is_finite()) {
            return invalid("reference orbit must have a positive radius");
        }
        if let Some(comet) = &self.comet {
            if !comet.orbit.is_valid() {
                return invalid("comet orbit must be a closed ellipse with a positive period");
            }
        }
        Ok(())
    }

    fn belt_shape(&self) -> BeltShape {
        BeltShape {
            count: self.asteroid_count,
            inner_radius: self.belt_inner,
            outer_radius: self.belt_outer,
            seed: self.belt_seed,
            min_size: self.asteroid_min_size,
            max_size: self.asteroid_max_size,
            reference_radius: self.reference_radius,
            reference_speed: self.reference_speed,
        }
    }
}

/// The generated decorative set, fixed for the engine's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorField {
    asteroids: Vec<Asteroid>,
    comet: Option<Comet>,
}

/// Pose of one asteroid in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecorPose {
    pub position: DVec3,
    pub spin: f64,
    pub size: f64,
    pub tint: Rgb,
}

/// Decorative output of one evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecorFrame {
    pub asteroids: Vec<DecorPose>,
    pub comet: Option<CometPose>,
}

impl DecorField {
    pub fn generate(config: &DecorConfig) -> OrreryResult<Self> {
        config.validate()?;
        let asteroids = generate_belt(&config.belt_shape());
        log::info!(
            "Decor: {} asteroids, comet {}",
            asteroids.len(),
            if config.comet.is_some() { "on" } else { "off" }
        );
        Ok(Self {
            asteroids,
            comet: config.comet,
        })
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn comet(&self) -> Option<&Comet> {
        self.comet.as_ref()
    }

    pub fn at(&self, time: f64) -> DecorFrame {
        DecorFrame {
            asteroids: self
                .asteroids
                .iter()
                .map(|rock| DecorPose {
                    position: rock.position(time),
                    spin: rock.spin(time),
                    size: rock.size,
                    tint: rock.tint,
                })
                .collect(),
            comet: self.comet.map(|c| c.pose(time)),
        }
    }
}
