pub mod camera;
pub mod instance;
pub mod lighting;
pub mod view;

pub use camera::{CameraUniform, OrbitCamera};
pub use instance::{BodyInstance, DecorInstance, InstanceBuffer, RingInstance};
pub use lighting::{Lighting, LightingConfig, PointLight};
pub use view::{ring_points, Band, BodyDraw, Label, OrbitRing, SceneComposer, SceneView, TextureTable};
