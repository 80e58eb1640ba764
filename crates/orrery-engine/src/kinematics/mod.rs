pub mod engine;
pub mod orbit;

pub use engine::{compute_positions, BodyPose, FramePositions, SpinRates};
pub use orbit::{circular_offset, solve_kepler, spin_angle, KeplerOrbit};
