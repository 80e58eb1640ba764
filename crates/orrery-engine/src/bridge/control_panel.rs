//! Control panel bridge.
//!
//! The widget layer never touches simulation state directly. It renders a
//! [`ControlLayout`] and sends every change through [`PanelBridge::apply`],
//! which forwards to the parameter store and reports back what the widget
//! should display.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::{OrreryError, OrreryResult};
use crate::api::types::{BodyKind, Rgb};
use crate::catalog::body::CelestialBody;
use crate::catalog::registry::BodyRegistry;
use crate::params::field::{ParamField, ParamValue};
use crate::params::limits::Range;
use crate::params::store::{is_editable, ParameterStore};

/// Order of the scalar sliders inside a folder.
const SLIDER_FIELDS: [ParamField; 3] = [ParamField::VisualSize, ParamField::Radius, ParamField::AngularSpeed];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Control {
    Slider {
        field: ParamField,
        min: f64,
        max: f64,
        step: f64,
        value: f64,
    },
    Color { field: ParamField, value: Rgb },
}

impl Control {
    pub fn field(&self) -> ParamField {
        match self {
            Control::Slider { field, .. } | Control::Color { field, .. } => *field,
        }
    }
}

/// One body's folder: its controls, then folders for its moons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Folder {
    pub body: String,
    pub controls: Vec<Control>,
    pub folders: Vec<Folder>,
}

/// Widget tree for the control panel: one folder per planet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlLayout {
    pub folders: Vec<Folder>,
    /// Store revision the current values were read at.
    pub revision: u64,
}

impl ControlLayout {
    pub fn build(registry: &BodyRegistry, store: &ParameterStore) -> OrreryResult<Self> {
        let revision = store.revision();
        let folders = registry
            .planets()
            .map(|planet| {
                let mut folder = folder_for(planet, store)?;
                for moon in registry.children(planet.id.as_str()) {
                    folder.folders.push(folder_for(moon, store)?);
                }
                Ok(folder)
            })
            .collect::<OrreryResult<Vec<_>>>()?;
        Ok(Self { folders, revision })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".into())
    }

    /// Depth-first lookup of a body's folder.
    pub fn folder(&self, body: &str) -> Option<&Folder> {
        fn find<'a>(folders: &'a [Folder], body: &str) -> Option<&'a Folder> {
            folders
                .iter()
                .find_map(|f| if f.body == body { Some(f) } else { find(&f.folders, body) })
        }
        find(&self.folders, body)
    }
}

fn folder_for(body: &CelestialBody, store: &ParameterStore) -> OrreryResult<Folder> {
    let params = store.get(body.id.as_str())?;
    let limits = store.limits();
    let mut controls = Vec::with_capacity(SLIDER_FIELDS.len() + 1);

    for field in SLIDER_FIELDS {
        if !is_editable(body.kind, field) {
            continue;
        }
        let Some(range) = limits.range(body.kind, field) else {
            continue;
        };
        let value = params.value(field).as_scalar().unwrap_or(range.min);
        controls.push(Control::Slider {
            field,
            min: range.min,
            max: range.max,
            step: slider_step(range),
            value,
        });
    }

    // Textured bodies ignore their tint, so there is nothing to pick.
    if !body.is_textured() {
        controls.push(Control::Color { field: ParamField::TintColor, value: params.tint });
    }

    Ok(Folder { body: body.id.to_string(), controls, folders: Vec::new() })
}

/// Two decimal digits below the span's order of magnitude.
fn slider_step(range: Range) -> f64 {
    let span = range.max - range.min;
    if span <= 0.0 || !span.is_finite() {
        return 0.0;
    }
    10f64.powf(span.log10().floor() - 2.0)
}

/// An edit sent by the widget layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamEdit {
    pub body: String,
    pub field: ParamField,
    pub value: ParamValue,
}

/// What the widget should show after an edit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EditOutcome {
    Accepted { body: String, field: ParamField, value: ParamValue },
    /// The store kept its old value; `value` is `None` when the body is unknown.
    Rejected { body: String, field: ParamField, error: String, value: Option<ParamValue> },
}

impl EditOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, EditOutcome::Accepted { .. })
    }

    /// The value the widget should display.
    pub fn value(&self) -> Option<ParamValue> {
        match self {
            EditOutcome::Accepted { value, .. } => Some(*value),
            EditOutcome::Rejected { value, .. } => *value,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".into())
    }
}

/// Two-way sync between the widget tree and the parameter store.
pub struct PanelBridge {
    registry: Arc<BodyRegistry>,
    store: Arc<ParameterStore>,
}

impl PanelBridge {
    pub fn new(registry: Arc<BodyRegistry>, store: Arc<ParameterStore>) -> Self {
        Self { registry, store }
    }

    pub fn layout(&self) -> OrreryResult<ControlLayout> {
        ControlLayout::build(&self.registry, &self.store)
    }

    pub fn apply(&self, edit: ParamEdit) -> EditOutcome {
        let ParamEdit { body, field, value } = edit;
        match self.store.update(&body, field, value) {
            Ok(()) => {
                let value = self.store.get(&body).map(|p| p.value(field)).unwrap_or(value);
                EditOutcome::Accepted { body, field, value }
            }
            Err(err) => {
                let retained = self.store.get(&body).ok().map(|p| p.value(field));
                EditOutcome::Rejected { body, field, error: err.to_string(), value: retained }
            }
        }
    }

    /// Parse an edit from the widget layer's JSON and apply it.
    pub fn apply_json(&self, json: &str) -> OrreryResult<EditOutcome> {
        let edit: ParamEdit = serde_json::from_str(json).map_err(OrreryError::Config)?;
        Ok(self.apply(edit))
    }

    /// Whether the panel shows a folder for this body.
    pub fn has_folder(&self, body: &str) -> bool {
        self.registry
            .get(body)
            .is_some_and(|b| matches!(b.kind, BodyKind::Planet | BodyKind::Moon))
    }
}
