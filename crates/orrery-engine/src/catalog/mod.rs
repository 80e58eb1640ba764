//! Static body catalog: the body model, its JSON manifest and the validated
//! registry built from it.

pub mod body;
pub mod manifest;
pub mod registry;
pub mod solar;

pub use body::{CelestialBody, RingHint};
pub use manifest::{CatalogManifest, MoonDescriptor, PlanetDescriptor, StarDescriptor};
pub use registry::BodyRegistry;
