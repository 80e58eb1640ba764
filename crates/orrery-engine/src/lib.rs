pub mod api;
pub mod bridge;
pub mod catalog;
pub mod core;
pub mod decor;
pub mod focus;
pub mod kinematics;
pub mod params;
pub mod scene;

// Re-export key types at crate root for convenience
pub use api::config::{EngineConfig, LabelLift};
pub use api::engine::{Frame, Orrery};
pub use api::error::{OrreryError, OrreryResult, RegistryDefect};
pub use api::types::{BodyId, BodyKind, Rgb, TextureRef};
pub use bridge::control_panel::{ControlLayout, EditOutcome, PanelBridge, ParamEdit};
pub use bridge::protocol::{FrameLayout, DEFAULT_MAX_LIGHTS, LIGHT_FLOATS};
pub use catalog::{BodyRegistry, CatalogManifest, CelestialBody, RingHint};
pub use core::time::SimClock;
pub use decor::{DecorConfig, DecorField, DecorFrame};
pub use focus::{CameraRig, FocusController, FocusInfo, FocusState, FocusTarget};
pub use kinematics::{compute_positions, BodyPose, FramePositions, SpinRates};
pub use params::{ParamField, ParamSnapshot, ParamValue, ParameterLimits, ParameterStore};
pub use scene::{
    BodyInstance, DecorInstance, InstanceBuffer, Lighting, OrbitCamera, RingInstance, SceneComposer,
    SceneView, TextureTable,
};
