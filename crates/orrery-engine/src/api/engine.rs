use std::sync::Arc;

use crate::api::config::EngineConfig;
use crate::api::error::{OrreryError, OrreryResult};
use crate::api::types::TextureRef;
use crate::bridge::protocol::FrameLayout;
use crate::catalog::registry::BodyRegistry;
use crate::catalog::solar;
use crate::core::time::SimClock;
use crate::decor::{DecorField, DecorFrame};
use crate::focus::{CameraRig, FocusController, FocusInfo, FocusState};
use crate::kinematics::engine::{compute_positions, FramePositions};
use crate::params::field::{ParamField, ParamValue};
use crate::params::store::{ParamSnapshot, ParameterStore};

/// One evaluation of the engine.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Evaluations since construction, starting at 0.
    pub index: u64,
    pub time: f64,
    /// Parameters the positions were computed from.
    pub params: ParamSnapshot,
    pub positions: FramePositions,
    pub decor: DecorFrame,
    pub focus: FocusState,
    /// True when the camera must re-aim (first frame, new selection, or the
    /// focused body moved).
    pub focus_changed: bool,
}

impl Frame {
    /// Hand the focus to the camera owner if it changed. Returns whether it did.
    pub fn publish(&self, rig: &mut impl CameraRig) -> bool {
        if self.focus_changed {
            rig.retarget(&self.focus);
        }
        self.focus_changed
    }
}

/// Process-scoped engine instance: registry, live parameters, focus and clock.
///
/// Created once at startup and torn down with [`Orrery::teardown`]. The
/// parameter store is shared through an `Arc` so a control panel can edit it
/// between frames while the render loop keeps evaluating.
pub struct Orrery {
    config: EngineConfig,
    registry: Arc<BodyRegistry>,
    params: Arc<ParameterStore>,
    focus: FocusController,
    clock: SimClock,
    decor: DecorField,
    frame_index: u64,
    published_focus: u64,
}

impl Orrery {
    /// Build the engine and evaluate t=0 so focus starts from real positions.
    pub fn new(config: EngineConfig, registry: BodyRegistry) -> OrreryResult<Self> {
        config.validate()?;
        check_capacity(&config, &registry)?;
        let registry = Arc::new(registry);
        let params = Arc::new(ParameterStore::initialize(
            &registry,
            config.limits.clone(),
            config.phases,
        ));
        let decor = DecorField::generate(&config.decor)?;
        let initial = compute_positions(0.0, &registry, &params.snapshot(), &config.spin_rates)?;
        let focus = FocusController::new(registry.clone(), initial);
        let clock = SimClock::new(config.time_scale, config.max_frame_dt);

        log::info!(
            "Orrery initialized: {} bodies, star {}",
            registry.len(),
            registry.star().id
        );

        Ok(Self {
            config,
            registry,
            params,
            focus,
            clock,
            decor,
            frame_index: 0,
            published_focus: 0,
        })
    }

    /// The built-in solar system with default configuration.
    pub fn solar_system() -> OrreryResult<Self> {
        let config = EngineConfig {
            backdrop: Some(TextureRef::new(solar::BACKDROP_TEXTURE)),
            ..Default::default()
        };
        Self::new(config, solar::registry()?)
    }

    /// Advance the clock by one frame delta, then evaluate.
    pub fn tick(&mut self, dt: f64) -> OrreryResult<Frame> {
        let time = self.clock.advance(dt)?;
        self.evaluate(time)
    }

    /// Evaluate every body at `time` and move the focus along.
    pub fn evaluate(&mut self, time: f64) -> OrreryResult<Frame> {
        let params = self.params.snapshot();
        let positions = compute_positions(time, &self.registry, &params, &self.config.spin_rates)?;
        let focus = self.focus.on_frame(&positions)?;

        let revision = self.focus.revision();
        let focus_changed = self.frame_index == 0 || revision != self.published_focus;
        self.published_focus = revision;

        let frame = Frame {
            index: self.frame_index,
            time,
            params,
            positions,
            decor: self.decor.at(time),
            focus,
            focus_changed,
        };
        self.frame_index += 1;
        Ok(frame)
    }

    pub fn select(&mut self, id: &str) -> OrreryResult<FocusState> {
        self.focus.select(id)
    }

    pub fn clear_selection(&mut self) -> FocusState {
        self.focus.clear()
    }

    pub fn update(&self, id: &str, field: ParamField, value: ParamValue) -> OrreryResult<()> {
        self.params.update(id, field, value)
    }

    /// Shared handle to the parameter store.
    pub fn params(&self) -> Arc<ParameterStore> {
        Arc::clone(&self.params)
    }

    pub fn registry(&self) -> &Arc<BodyRegistry> {
        &self.registry
    }

    pub fn focus(&self) -> &FocusState {
        self.focus.current()
    }

    pub fn focus_info(&self) -> FocusInfo {
        self.focus.info()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut SimClock {
        &mut self.clock
    }

    pub fn decor(&self) -> &DecorField {
        &self.decor
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn frames_evaluated(&self) -> u64 {
        self.frame_index
    }

    /// Shut the engine down. Outstanding parameter-store handles stay valid
    /// but are no longer read.
    pub fn teardown(self) {
        log::info!(
            "Orrery torn down after {} frames at t={:.2}",
            self.frame_index,
            self.clock.elapsed()
        );
    }
}

/// Every body, ring and decor instance must fit the shared buffers.
fn check_capacity(config: &EngineConfig, registry: &BodyRegistry) -> OrreryResult<()> {
    let layout = FrameLayout::from_config(config);
    let bodies = registry.len();
    let rings = registry.len().saturating_sub(1)
        + registry.bodies().iter().filter(|b| b.rings.is_some()).count();
    let decor = config.decor.asteroid_count + usize::from(config.decor.comet.is_some());

    let over = |what: &str, needed: usize, capacity: usize| {
        OrreryError::InvalidConfig(format!(
            "{what} capacity is {capacity} but {needed} instances are needed"
        ))
    };
    if bodies > layout.max_bodies {
        return Err(over("body", bodies, layout.max_bodies));
    }
    if rings > layout.max_rings {
        return Err(over("ring", rings, layout.max_rings));
    }
    if decor > layout.max_decor {
        return Err(over("decor", decor, layout.max_decor));
    }
    Ok(())
}
