use serde::{Deserialize, Serialize};

use crate::api::types::{BodyId, BodyKind, Rgb, TextureRef};

/// Decorative ring system drawn around a body (Saturn).
/// Radii are multiples of the body's live visual size so they follow edits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingHint {
    pub inner: f64,
    pub outer: f64,
    pub color: Rgb,
    #[serde(default = "default_ring_opacity")]
    pub opacity: f32,
}

fn default_ring_opacity() -> f32 {
    0.5
}

/// Immutable catalog entry for a star, planet or moon.
///
/// Base values seed the live parameter store; the catalog itself never
/// changes after the registry is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CelestialBody {
    pub id: BodyId,
    pub kind: BodyKind,
    /// Nominal visual radius.
    pub base_radius: f64,
    /// Nominal orbit radius around the parent (0 for the star).
    pub base_orbit_radius: f64,
    /// Nominal angular speed in rad/s. Negative is retrograde.
    pub base_angular_speed: f64,
    /// Tint used when no texture is bound.
    pub fallback_color: Rgb,
    #[serde(default)]
    pub texture: Option<TextureRef>,
    /// `None` only for the star.
    #[serde(default)]
    pub parent: Option<BodyId>,
    /// Color of the orbit ring and label.
    #[serde(default)]
    pub orbit_color: Option<Rgb>,
    #[serde(default)]
    pub rings: Option<RingHint>,
    /// Self-illumination color (the star's glow).
    #[serde(default)]
    pub emissive: Option<Rgb>,
}

impl CelestialBody {
    pub fn star(id: impl Into<BodyId>, radius: f64, color: Rgb) -> Self {
        Self {
            id: id.into(),
            kind: BodyKind::Star,
            base_radius: radius,
            base_orbit_radius: 0.0,
            base_angular_speed: 0.0,
            fallback_color: color,
            texture: None,
            parent: None,
            orbit_color: None,
            rings: None,
            emissive: None,
        }
    }

    pub fn planet(
        id: impl Into<BodyId>,
        star: impl Into<BodyId>,
        radius: f64,
        orbit_radius: f64,
        angular_speed: f64,
        color: Rgb,
    ) -> Self {
        Self {
            id: id.into(),
            kind: BodyKind::Planet,
            base_radius: radius,
            base_orbit_radius: orbit_radius,
            base_angular_speed: angular_speed,
            fallback_color: color,
            texture: None,
            parent: Some(star.into()),
            orbit_color: None,
            rings: None,
            emissive: None,
        }
    }

    pub fn moon(
        id: impl Into<BodyId>,
        planet: impl Into<BodyId>,
        radius: f64,
        orbit_radius: f64,
        angular_speed: f64,
        color: Rgb,
    ) -> Self {
        Self {
            kind: BodyKind::Moon,
            ..Self::planet(id, planet, radius, orbit_radius, angular_speed, color)
        }
    }

    // -- Builder pattern --

    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(TextureRef::new(texture));
        self
    }

    pub fn with_orbit_color(mut self, color: Rgb) -> Self {
        self.orbit_color = Some(color);
        self
    }

    pub fn with_rings(mut self, rings: RingHint) -> Self {
        self.rings = Some(rings);
        self
    }

    pub fn with_emissive(mut self, color: Rgb) -> Self {
        self.emissive = Some(color);
        self
    }

    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moon_builder_sets_kind_and_parent() {
        let moon = CelestialBody::moon("Phobos", "Mars", 0.11, 1.2, 2.5, Rgb::new(0xbb, 0xbb, 0xbb));
        assert_eq!(moon.kind, BodyKind::Moon);
        assert_eq!(moon.parent.as_ref().map(BodyId::as_str), Some("Mars"));
        assert!(!moon.is_textured());
    }

    #[test]
    fn optional_fields_default_in_json() {
        let json = r##"{
            "id": "Pluto",
            "kind": "planet",
            "base_radius": 0.18,
            "base_orbit_radius": 100.0,
            "base_angular_speed": 0.02,
            "fallback_color": "#cccccc",
            "parent": "Sun"
        }"##;
        let body: CelestialBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.texture, None);
        assert_eq!(body.rings, None);
        assert_eq!(body.parent, Some(BodyId::new("Sun")));
    }
}
