//! Scene lighting: a flat ambient term plus a point light sitting on the star.
//!
//! Lights are re-derived every frame from the star's pose, so they always
//! sit where the star is drawn.

use bytemuck::{Pod, Zeroable};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::api::types::Rgb;

/// A 3D point light.
///
/// Wire format (8 floats / 32 bytes):
/// `[x, y, z, r, g, b, intensity, _pad]`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PointLight {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub intensity: f32,
    pub _pad: f32,
}

impl PointLight {
    pub const FLOATS: usize = 8;

    pub fn new(pos: DVec3, color: Rgb, intensity: f32) -> Self {
        let [r, g, b] = color.to_f32();
        Self {
            x: pos.x as f32,
            y: pos.y as f32,
            z: pos.z as f32,
            r,
            g,
            b,
            intensity,
            _pad: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient_color: Rgb,
    pub ambient_intensity: f32,
    /// Light emitted from the star's position.
    pub star_color: Rgb,
    pub star_intensity: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: Rgb::WHITE,
            ambient_intensity: 0.6,
            star_color: Rgb::new(0xff, 0xfd, 0xe0),
            star_intensity: 2.6,
        }
    }
}

/// Lights for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    /// Ambient color premultiplied by its intensity.
    pub ambient: [f32; 3],
    pub lights: Vec<PointLight>,
}

impl Lighting {
    pub fn star_lit(config: &LightingConfig, star_position: DVec3) -> Self {
        let [r, g, b] = config.ambient_color.to_f32();
        let k = config.ambient_intensity;
        Self {
            ambient: [r * k, g * k, b * k],
            lights: vec![PointLight::new(star_position, config.star_color, config.star_intensity)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_light_is_8_floats() {
        assert_eq!(std::mem::size_of::<PointLight>(), PointLight::FLOATS * 4);
    }

    #[test]
    fn star_light_sits_on_star() {
        let lighting = Lighting::star_lit(&LightingConfig::default(), DVec3::ZERO);
        assert_eq!(lighting.lights.len(), 1);
        let sun = lighting.lights[0];
        assert_eq!((sun.x, sun.y, sun.z), (0.0, 0.0, 0.0));
        assert_eq!(sun.intensity, 2.6);
        assert!((lighting.ambient[0] - 0.6).abs() < 1e-6);
    }
}
