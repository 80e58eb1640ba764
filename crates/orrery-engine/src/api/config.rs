use serde::{Deserialize, Serialize};

use crate::api::error::{OrreryError, OrreryResult};
use crate::api::types::TextureRef;
use crate::decor::DecorConfig;
use crate::kinematics::engine::SpinRates;
use crate::params::limits::ParameterLimits;
use crate::params::store::PhaseSteps;
use crate::scene::lighting::LightingConfig;

/// Vertical offset of a body's label above its surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelLift {
    pub planet: f64,
    pub moon: f64,
}

impl Default for LabelLift {
    fn default() -> Self {
        Self {
            planet: 1.2,
            moon: 0.5,
        }
    }
}

/// Configuration for the engine. Every field has a default; JSON overrides
/// may name any subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Accepted ranges for parameter edits.
    pub limits: ParameterLimits,
    /// Self-rotation rates (rad/s).
    pub spin_rates: SpinRates,
    /// Initial phase spreading.
    pub phases: PhaseSteps,
    /// Simulated seconds per real second (default: 1.0).
    pub time_scale: f64,
    /// Longest frame delta the clock accepts in one tick (default: 0.1 s).
    pub max_frame_dt: f64,
    pub decor: DecorConfig,
    /// Line segments per orbit ring (default: 128).
    pub ring_segments: usize,
    pub label_lift: LabelLift,
    pub lighting: LightingConfig,
    /// Background sphere texture, passed through to the view layer.
    pub backdrop: Option<TextureRef>,
    /// Capacity of the shared body instance buffer (default: 64).
    pub max_bodies: usize,
    /// Capacity of the shared decor instance buffer (default: 512).
    pub max_decor: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            limits: ParameterLimits::default(),
            spin_rates: SpinRates::default(),
            phases: PhaseSteps::default(),
            time_scale: 1.0,
            max_frame_dt: 0.1,
            decor: DecorConfig::default(),
            ring_segments: 128,
            label_lift: LabelLift::default(),
            lighting: LightingConfig::default(),
            backdrop: None,
            max_bodies: 64,
            max_decor: 512,
        }
    }
}

impl EngineConfig {
    /// Parse overrides from JSON and validate them.
    pub fn from_json(json: &str) -> OrreryResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(OrreryError::Config)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> OrreryResult<()> {
        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(OrreryError::InvalidConfig(format!(
                "time_scale must be finite and >= 0, got {}",
                self.time_scale
            )));
        }
        if !self.max_frame_dt.is_finite() || self.max_frame_dt <= 0.0 {
            return Err(OrreryError::InvalidConfig(format!(
                "max_frame_dt must be finite and > 0, got {}",
                self.max_frame_dt
            )));
        }
        if self.ring_segments < 3 {
            return Err(OrreryError::InvalidConfig(format!(
                "ring_segments must be at least 3, got {}",
                self.ring_segments
            )));
        }
        let spins = &self.spin_rates;
        for (kind, rate) in [("star", spins.star), ("planet", spins.planet), ("moon", spins.moon)] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(OrreryError::InvalidConfig(format!(
                    "spin_rates.{kind} must be finite and >= 0, got {rate}"
                )));
            }
        }
        for (kind, step) in [("planet", self.phases.planet), ("moon", self.phases.moon)] {
            if !step.is_finite() {
                return Err(OrreryError::InvalidConfig(format!(
                    "phases.{kind} must be finite, got {step}"
                )));
            }
        }
        self.decor.validate()
    }
}
