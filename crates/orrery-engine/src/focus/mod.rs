pub mod controller;

pub use controller::{CameraRig, FocusController, FocusInfo, FocusState, FocusTarget};
