//! Solar System: the Sun, nine planets and their moons, with an asteroid
//! belt between Mars and Jupiter and a comet on an eccentric orbit.
//!
//! The catalog and engine overrides are authored as JSON next to the crate.

use orrery_engine::{BodyRegistry, EngineConfig, Orrery, OrreryResult};

const CATALOG_JSON: &str = include_str!("../assets/catalog.json");
const CONFIG_JSON: &str = include_str!("../assets/config.json");

pub fn build() -> OrreryResult<Orrery> {
    let config = EngineConfig::from_json(CONFIG_JSON)?;
    let registry = BodyRegistry::from_json(CATALOG_JSON)?;
    log::info!(
        "solar-system: {} bodies, {} asteroids",
        registry.len(),
        config.decor.asteroid_count
    );
    Orrery::new(config, registry)
}
