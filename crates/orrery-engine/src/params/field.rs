use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::types::Rgb;

/// An editable orbital/visual parameter.
///
/// Wire names match the control panel's slider labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamField {
    /// Orbit radius around the parent.
    #[serde(rename = "orbit", alias = "radius")]
    Radius,
    #[serde(rename = "speed", alias = "angular_speed")]
    AngularSpeed,
    #[serde(rename = "size", alias = "visual_size")]
    VisualSize,
    /// Tint, only visible when no texture is bound.
    #[serde(rename = "color", alias = "tint")]
    TintColor,
}

impl ParamField {
    pub const ALL: [ParamField; 4] = [
        ParamField::Radius,
        ParamField::AngularSpeed,
        ParamField::VisualSize,
        ParamField::TintColor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParamField::Radius => "orbit",
            ParamField::AngularSpeed => "speed",
            ParamField::VisualSize => "size",
            ParamField::TintColor => "color",
        }
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown parameter field {0:?}")]
pub struct UnknownField(pub String);

impl FromStr for ParamField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orbit" | "radius" => Ok(ParamField::Radius),
            "speed" | "angular_speed" => Ok(ParamField::AngularSpeed),
            "size" | "visual_size" => Ok(ParamField::VisualSize),
            "color" | "tint" => Ok(ParamField::TintColor),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// A value for a `ParamField`: a number for the scalar fields, a color for the tint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Scalar(f64),
    Color(Rgb),
}

impl ParamValue {
    pub fn as_scalar(self) -> Option<f64> {
        match self {
            ParamValue::Scalar(v) => Some(v),
            ParamValue::Color(_) => None,
        }
    }

    pub fn as_color(self) -> Option<Rgb> {
        match self {
            ParamValue::Color(c) => Some(c),
            ParamValue::Scalar(_) => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Scalar(v)
    }
}

impl From<Rgb> for ParamValue {
    fn from(c: Rgb) -> Self {
        ParamValue::Color(c)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Scalar(v) => write!(f, "{v}"),
            ParamValue::Color(c) => write!(f, "{c}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip() {
        for field in ParamField::ALL {
            assert_eq!(field.name().parse::<ParamField>().unwrap(), field);
        }
        assert_eq!("radius".parse::<ParamField>().unwrap(), ParamField::Radius);
        assert!("phase".parse::<ParamField>().is_err());
    }

    #[test]
    fn value_deserializes_numbers_and_colors() {
        let v: ParamValue = serde_json::from_str("25.5").unwrap();
        assert_eq!(v, ParamValue::Scalar(25.5));
        let v: ParamValue = serde_json::from_str("\"#ff00fa\"").unwrap();
        assert_eq!(v, ParamValue::Color(Rgb::new(0xff, 0x00, 0xfa)));
        assert!(serde_json::from_str::<ParamValue>("\"magenta\"").is_err());
    }

    #[test]
    fn field_serializes_with_panel_names() {
        assert_eq!(serde_json::to_string(&ParamField::AngularSpeed).unwrap(), "\"speed\"");
    }

    #[test]
    fn json_accepts_the_same_aliases_as_parsing() {
        for alias in ["radius", "angular_speed", "visual_size", "tint"] {
            let from_json: ParamField = serde_json::from_str(&format!("\"{alias}\"")).unwrap();
            assert_eq!(from_json, alias.parse::<ParamField>().unwrap());
        }
        assert!(serde_json::from_str::<ParamField>("\"phase\"").is_err());
    }
}
