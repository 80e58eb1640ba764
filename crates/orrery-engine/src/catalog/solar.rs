//! Built-in catalog: the Sun, nine planets and their major moons.
//!
//! Distances and sizes are exaggerated for readability, and orbits are slowed
//! down so the outer planets visibly move. Speeds are rad/s.

use crate::api::error::OrreryResult;
use crate::api::types::Rgb;
use crate::catalog::body::{CelestialBody, RingHint};
use crate::catalog::registry::BodyRegistry;

pub const STAR_NAME: &str = "Sun";
pub const SUN_SIZE: f64 = 3.2;
pub const SUN_COLOR: Rgb = Rgb::new(0xff, 0xf2, 0x6b);

/// Ring color for moon orbits.
pub const MOON_ORBIT_COLOR: Rgb = Rgb::new(0xff, 0x00, 0xfa);

/// Background sphere texture.
pub const BACKDROP_TEXTURE: &str = "/textures/milkyway.jpg";

const fn hex(rgb: u32) -> Rgb {
    Rgb::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

struct PlanetRow {
    name: &'static str,
    texture: Option<&'static str>,
    color: u32,
    orbit_color: u32,
    size: f64,
    orbit: f64,
    speed: f64,
}

struct MoonRow {
    name: &'static str,
    parent: &'static str,
    texture: Option<&'static str>,
    color: u32,
    size: f64,
    orbit: f64,
    speed: f64,
}

#[rustfmt::skip]
const PLANETS: [PlanetRow; 9] = [
    PlanetRow { name: "Mercury", texture: Some("/textures/mercury.jpg"), color: 0xb5b5b5, orbit_color: 0x00ffe7, size: 0.38, orbit: 10.0,  speed: 0.24 },
    PlanetRow { name: "Venus",   texture: Some("/textures/venus.jpg"),   color: 0xeec97d, orbit_color: 0xffb347, size: 0.95, orbit: 15.0,  speed: 0.18 },
    PlanetRow { name: "Earth",   texture: Some("/textures/earth.jpg"),   color: 0x4a90e2, orbit_color: 0x4a90e2, size: 1.0,  orbit: 20.0,  speed: 0.15 },
    PlanetRow { name: "Mars",    texture: Some("/textures/mars.jpg"),    color: 0xe1642b, orbit_color: 0xe1642b, size: 0.53, orbit: 27.0,  speed: 0.13 },
    PlanetRow { name: "Jupiter", texture: Some("/textures/jupiter.jpg"), color: 0xfff3c2, orbit_color: 0xfff3c2, size: 11.2, orbit: 40.0,  speed: 0.08 },
    PlanetRow { name: "Saturn",  texture: Some("/textures/saturn.jpg"),  color: 0xe7d19a, orbit_color: 0xe7d19a, size: 9.45, orbit: 55.0,  speed: 0.06 },
    PlanetRow { name: "Uranus",  texture: Some("/textures/uranus.jpg"),  color: 0x7fffff, orbit_color: 0x7fffff, size: 4.0,  orbit: 70.0,  speed: 0.04 },
    PlanetRow { name: "Neptune", texture: Some("/textures/neptune.jpg"), color: 0x417fff, orbit_color: 0x417fff, size: 3.88, orbit: 85.0,  speed: 0.03 },
    // No texture available: tinted by color, which stays editable.
    PlanetRow { name: "Pluto",   texture: None,                          color: 0xcccccc, orbit_color: 0xcccccc, size: 0.18, orbit: 100.0, speed: 0.02 },
];

#[rustfmt::skip]
const MOONS: [MoonRow; 9] = [
    MoonRow { name: "Moon",    parent: "Earth",   texture: Some("/textures/moon.jpg"), color: 0xcccccc, size: 0.27, orbit: 2.0, speed: 1.5 },
    MoonRow { name: "Phobos",  parent: "Mars",    texture: None, color: 0xbbbbbb, size: 0.11, orbit: 1.2, speed: 2.5 },
    MoonRow { name: "Deimos",  parent: "Mars",    texture: None, color: 0xbbbbbb, size: 0.06, orbit: 1.7, speed: 1.2 },
    MoonRow { name: "Io",      parent: "Jupiter", texture: None, color: 0xe6e27a, size: 0.29, orbit: 2.5, speed: 2.2 },
    MoonRow { name: "Titan",   parent: "Saturn",  texture: None, color: 0xe6be8a, size: 0.4,  orbit: 3.0, speed: 1.7 },
    MoonRow { name: "Miranda", parent: "Uranus",  texture: None, color: 0xd8e6ff, size: 0.12, orbit: 2.2, speed: 1.2 },
    // Retrograde, as the real Triton.
    MoonRow { name: "Triton",  parent: "Neptune", texture: None, color: 0xb3cfff, size: 0.21, orbit: 2.5, speed: -1.1 },
    MoonRow { name: "Charon",  parent: "Pluto",   texture: None, color: 0xbbbbbb, size: 0.09, orbit: 1.5, speed: 0.8 },
    MoonRow { name: "Europa",  parent: "Jupiter", texture: None, color: 0xcbb89a, size: 0.25, orbit: 4.0, speed: 1.6 },
];

const SATURN_RINGS: RingHint = RingHint {
    inner: 1.25,
    outer: 2.2,
    color: hex(0xe7d19a),
    opacity: 0.5,
};

/// The built-in body list in catalog order (star, planets, moons).
pub fn solar_system() -> Vec<CelestialBody> {
    let mut bodies = Vec::with_capacity(1 + PLANETS.len() + MOONS.len());

    bodies.push(
        CelestialBody::star(STAR_NAME, SUN_SIZE, SUN_COLOR)
            .with_texture("/textures/sun.jpg")
            .with_emissive(SUN_COLOR),
    );

    for row in &PLANETS {
        let mut planet = CelestialBody::planet(row.name, STAR_NAME, row.size, row.orbit, row.speed, hex(row.color))
            .with_orbit_color(hex(row.orbit_color));
        if let Some(texture) = row.texture {
            planet = planet.with_texture(texture);
        }
        if row.name == "Saturn" {
            planet = planet.with_rings(SATURN_RINGS);
        }
        bodies.push(planet);
    }

    for row in &MOONS {
        let mut moon = CelestialBody::moon(row.name, row.parent, row.size, row.orbit, row.speed, hex(row.color))
            .with_orbit_color(MOON_ORBIT_COLOR);
        if let Some(texture) = row.texture {
            moon = moon.with_texture(texture);
        }
        bodies.push(moon);
    }

    bodies
}

/// Validated registry for the built-in catalog.
pub fn registry() -> OrreryResult<BodyRegistry> {
    BodyRegistry::new(solar_system())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::BodyKind;

    #[test]
    fn builtin_catalog_validates() {
        let reg = registry().unwrap();
        assert_eq!(reg.len(), 1 + 9 + 9);
        assert_eq!(reg.star().id.as_str(), STAR_NAME);
        assert_eq!(reg.planets().count(), 9);
    }

    #[test]
    fn moon_parents_are_planets() {
        let reg = registry().unwrap();
        for moon in reg.bodies().iter().filter(|b| b.kind == BodyKind::Moon) {
            let parent = reg.get(moon.parent.as_ref().unwrap().as_str()).unwrap();
            assert_eq!(parent.kind, BodyKind::Planet, "moon {} has invalid parent", moon.id);
        }
    }

    #[test]
    fn jupiter_moons_keep_catalog_order() {
        let reg = registry().unwrap();
        let names: Vec<&str> = reg.children("Jupiter").map(|b| b.id.as_str()).collect();
        assert_eq!(names, ["Io", "Europa"]);
    }

    #[test]
    fn only_saturn_has_rings() {
        let bodies = solar_system();
        let ringed: Vec<&str> = bodies
            .iter()
            .filter(|b| b.rings.is_some())
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(ringed, ["Saturn"]);
    }

    #[test]
    fn hex_helper_splits_channels() {
        assert_eq!(hex(0x4a90e2), Rgb::new(0x4a, 0x90, 0xe2));
    }
}
