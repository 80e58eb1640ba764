pub mod control_panel;
pub mod protocol;

pub use control_panel::{Control, ControlLayout, EditOutcome, Folder, PanelBridge, ParamEdit};
pub use protocol::FrameLayout;
