use serde::{Deserialize, Serialize};

use crate::api::types::Rgb;
use crate::catalog::body::{CelestialBody, RingHint};

/// Body catalog as authored in JSON: one star, planets with nested moons.
/// Loaded at startup and turned into a flat body list for the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogManifest {
    pub star: StarDescriptor,
    #[serde(default)]
    pub planets: Vec<PlanetDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarDescriptor {
    pub name: String,
    pub size: f64,
    pub color: Rgb,
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub emissive: Option<Rgb>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanetDescriptor {
    pub name: String,
    /// Visual radius.
    pub size: f64,
    /// Orbit radius around the star.
    pub orbit: f64,
    /// Angular speed (rad/s).
    pub speed: f64,
    #[serde(default = "default_planet_color")]
    pub color: Rgb,
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub orbit_color: Option<Rgb>,
    #[serde(default)]
    pub rings: Option<RingHint>,
    #[serde(default)]
    pub moons: Vec<MoonDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoonDescriptor {
    pub name: String,
    pub size: f64,
    /// Orbit radius measured from the parent's surface.
    pub orbit: f64,
    pub speed: f64,
    #[serde(default = "default_moon_color")]
    pub color: Rgb,
    #[serde(default)]
    pub texture: Option<String>,
}

fn default_planet_color() -> Rgb {
    Rgb::new(0x88, 0x88, 0x88)
}

fn default_moon_color() -> Rgb {
    Rgb::new(0xbb, 0xbb, 0xbb)
}

impl CatalogManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Flatten into catalog order: star, then each planet followed by its moons.
    pub fn to_bodies(&self) -> Vec<CelestialBody> {
        let star = &self.star;
        let mut bodies = Vec::with_capacity(
            1 + self.planets.iter().map(|p| 1 + p.moons.len()).sum::<usize>(),
        );

        let mut sun = CelestialBody::star(star.name.as_str(), star.size, star.color);
        sun.texture = star.texture.clone().map(Into::into);
        sun.emissive = star.emissive;
        bodies.push(sun);

        for planet in &self.planets {
            let mut body = CelestialBody::planet(
                planet.name.as_str(),
                star.name.as_str(),
                planet.size,
                planet.orbit,
                planet.speed,
                planet.color,
            );
            body.texture = planet.texture.clone().map(Into::into);
            body.orbit_color = planet.orbit_color;
            body.rings = planet.rings;
            bodies.push(body);

            for moon in &planet.moons {
                let mut body = CelestialBody::moon(
                    moon.name.as_str(),
                    planet.name.as_str(),
                    moon.size,
                    moon.orbit,
                    moon.speed,
                    moon.color,
                );
                body.texture = moon.texture.clone().map(Into::into);
                bodies.push(body);
            }
        }
        bodies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::BodyKind;

    const MANIFEST: &str = r##"{
        "star": { "name": "Sun", "size": 3.2, "color": "#fff26b", "texture": "/textures/sun.jpg" },
        "planets": [
            {
                "name": "Mars", "size": 0.53, "orbit": 27, "speed": 0.13,
                "color": "#e1642b", "texture": "/textures/mars.jpg",
                "moons": [
                    { "name": "Phobos", "size": 0.11, "orbit": 1.2, "speed": 2.5 },
                    { "name": "Deimos", "size": 0.06, "orbit": 1.7, "speed": 1.2, "color": "#aaaaaa" }
                ]
            },
            { "name": "Pluto", "size": 0.18, "orbit": 100, "speed": 0.02 }
        ]
    }"##;

    #[test]
    fn parses_nested_catalog() {
        let manifest = CatalogManifest::from_json(MANIFEST).unwrap();
        assert_eq!(manifest.planets.len(), 2);
        assert_eq!(manifest.planets[0].moons.len(), 2);
        assert_eq!(manifest.planets[1].color, Rgb::new(0x88, 0x88, 0x88));
        assert_eq!(manifest.planets[0].moons[0].color, Rgb::new(0xbb, 0xbb, 0xbb));
    }

    #[test]
    fn flattens_star_planets_then_moons() {
        let bodies = CatalogManifest::from_json(MANIFEST).unwrap().to_bodies();
        let names: Vec<&str> = bodies.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(names, ["Sun", "Mars", "Phobos", "Deimos", "Pluto"]);

        assert_eq!(bodies[0].kind, BodyKind::Star);
        assert_eq!(bodies[2].kind, BodyKind::Moon);
        assert_eq!(bodies[2].parent.as_ref().unwrap().as_str(), "Mars");
        assert_eq!(bodies[4].parent.as_ref().unwrap().as_str(), "Sun");
        assert_eq!(bodies[1].texture.as_ref().unwrap().as_str(), "/textures/mars.jpg");
    }

    #[test]
    fn malformed_color_is_a_parse_error() {
        let json = r#"{ "star": { "name": "Sun", "size": 1, "color": "yellow" } }"#;
        assert!(CatalogManifest::from_json(json).is_err());
    }
}
