use serde::{Deserialize, Serialize};

use crate::api::types::{BodyKind, Rgb};
use crate::params::field::{ParamField, ParamValue};

/// Inclusive value range for a slider-style parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Accepted ranges for one body kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KindLimits {
    pub radius: Range,
    pub visual_size: Range,
    pub angular_speed: Range,
}

/// Per-kind parameter ranges enforced by the parameter store.
///
/// Defaults follow the control panel slider ranges; speed ranges are
/// symmetric so retrograde orbits can be dialed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterLimits {
    pub star: KindLimits,
    pub planet: KindLimits,
    pub moon: KindLimits,
}

impl Default for ParameterLimits {
    fn default() -> Self {
        Self {
            // The star does not orbit; only its size and tint are editable.
            star: KindLimits {
                radius: Range::new(0.0, 0.0),
                visual_size: Range::new(0.1, 12.0),
                angular_speed: Range::new(0.0, 0.0),
            },
            planet: KindLimits {
                radius: Range::new(5.0, 120.0),
                visual_size: Range::new(0.1, 12.0),
                angular_speed: Range::new(-1.0, 1.0),
            },
            moon: KindLimits {
                radius: Range::new(0.6, 10.0),
                visual_size: Range::new(0.01, 2.0),
                angular_speed: Range::new(-5.0, 5.0),
            },
        }
    }
}

/// A parameter edit that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValidEdit {
    Radius(f64),
    AngularSpeed(f64),
    VisualSize(f64),
    Tint(Rgb),
}

impl ParameterLimits {
    pub fn for_kind(&self, kind: BodyKind) -> &KindLimits {
        match kind {
            BodyKind::Star => &self.star,
            BodyKind::Planet => &self.planet,
            BodyKind::Moon => &self.moon,
        }
    }

    /// Slider range for a field; `None` for the color field.
    pub fn range(&self, kind: BodyKind, field: ParamField) -> Option<Range> {
        let limits = self.for_kind(kind);
        match field {
            ParamField::Radius => Some(limits.radius),
            ParamField::AngularSpeed => Some(limits.angular_speed),
            ParamField::VisualSize => Some(limits.visual_size),
            ParamField::TintColor => None,
        }
    }

    /// Validate a value for a field, returning the rejection reason on failure.
    /// Values are never clamped.
    pub fn validate(
        &self,
        kind: BodyKind,
        field: ParamField,
        value: ParamValue,
    ) -> Result<ValidEdit, String> {
        let limits = self.for_kind(kind);
        match field {
            ParamField::Radius => scalar(value, limits.radius, true).map(ValidEdit::Radius),
            ParamField::AngularSpeed => {
                scalar(value, limits.angular_speed, false).map(ValidEdit::AngularSpeed)
            }
            ParamField::VisualSize => {
                scalar(value, limits.visual_size, true).map(ValidEdit::VisualSize)
            }
            ParamField::TintColor => value
                .as_color()
                .map(ValidEdit::Tint)
                .ok_or_else(|| format!("expected a #rrggbb color, got {value}")),
        }
    }
}

fn scalar(value: ParamValue, range: Range, positive: bool) -> Result<f64, String> {
    let v = value
        .as_scalar()
        .ok_or_else(|| format!("expected a number, got {value}"))?;
    if !v.is_finite() {
        return Err(format!("must be finite, got {v}"));
    }
    if positive && v <= 0.0 {
        return Err(format!("must be > 0, got {v}"));
    }
    if !range.contains(v) {
        return Err(format!("must be within [{}, {}], got {v}", range.min, range.max));
    }
    Ok(v)
}
