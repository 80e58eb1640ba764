//! Error taxonomy for the orrery engine.

use thiserror::Error;

use crate::api::types::BodyKind;
use crate::params::ParamField;

/// Result type for engine operations.
pub type OrreryResult<T> = Result<T, OrreryError>;

/// Errors surfaced by the engine.
///
/// Registry and hierarchy errors are construction defects and are never
/// retried; everything else is reported back to the originating caller with
/// engine state left untouched.
#[derive(Error, Debug)]
pub enum OrreryError {
    #[error("invalid body registry: {0}")]
    RegistryInvalid(#[from] RegistryDefect),

    #[error("unknown body: {0}")]
    UnknownBody(String),

    #[error("{field} of {body} rejected: {reason}")]
    ParameterRange {
        body: String,
        field: ParamField,
        reason: String,
    },

    #[error("{field} is not editable for {body}")]
    FieldNotEditable { body: String, field: ParamField },

    #[error("{body}: parent {parent} has no position in this frame")]
    HierarchyResolution { body: String, parent: String },

    #[error("no pose computed for focused body {0}")]
    MissingPose(String),

    #[error("invalid simulation time: {0}")]
    InvalidTime(f64),

    #[error("catalog manifest: {0}")]
    Manifest(#[source] serde_json::Error),

    #[error("engine config: {0}")]
    Config(#[source] serde_json::Error),

    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
}

impl OrreryError {
    /// Whether this error signals a broken construction invariant rather than
    /// a bad request. Fatal errors must stop startup.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            OrreryError::RegistryInvalid(_)
                | OrreryError::HierarchyResolution { .. }
                | OrreryError::MissingPose(_)
        )
    }
}

/// A concrete reason a body catalog failed validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryDefect {
    #[error("body with empty id")]
    EmptyId,

    #[error("duplicate body id {0}")]
    DuplicateId(String),

    #[error("catalog has no star")]
    MissingStar,

    #[error("catalog has more than one star ({0}, {1})")]
    MultipleStars(String, String),

    #[error("star {0} must not have a parent")]
    StarWithParent(String),

    #[error("{0} has no parent")]
    MissingParent(String),

    #[error("{body} refers to unknown parent {parent}")]
    OrphanedParent { body: String, parent: String },

    #[error("{body} ({kind}) cannot orbit {parent} ({parent_kind})")]
    WrongParentKind {
        body: String,
        kind: BodyKind,
        parent: String,
        parent_kind: BodyKind,
    },

    #[error("{body} has invalid {quantity}: {value}")]
    InvalidBaseValue {
        body: String,
        quantity: &'static str,
        value: f64,
    },
}
