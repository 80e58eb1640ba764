pub mod field;
pub mod limits;
pub mod store;

pub use field::{ParamField, ParamValue, UnknownField};
pub use limits::{KindLimits, ParameterLimits, Range, ValidEdit};
pub use store::{is_editable, OrbitalParameters, ParamSnapshot, ParameterStore, PhaseSteps};
