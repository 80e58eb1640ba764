use std::fmt;
use std::sync::Arc;

use glam::DVec3;
use serde::Serialize;

use crate::api::error::{OrreryError, OrreryResult};
use crate::api::types::{BodyId, BodyKind};
use crate::catalog::registry::BodyRegistry;
use crate::kinematics::engine::FramePositions;

/// What the camera is aimed at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FocusTarget {
    /// Nothing selected yet: the star at the origin.
    #[default]
    Origin,
    Body(BodyId),
}

impl FocusTarget {
    pub fn body(&self) -> Option<&BodyId> {
        match self {
            FocusTarget::Origin => None,
            FocusTarget::Body(id) => Some(id),
        }
    }
}

impl fmt::Display for FocusTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FocusTarget::Origin => f.write_str("<origin>"),
            FocusTarget::Body(id) => write!(f, "{id}"),
        }
    }
}

/// Published camera target.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusState {
    pub target: FocusTarget,
    pub world_position: DVec3,
    /// Time of the evaluation `world_position` was read from.
    pub time: f64,
}

/// External owner of camera mechanics. Re-aims whenever focus changes.
pub trait CameraRig {
    fn retarget(&mut self, focus: &FocusState);
}

/// Info-panel description of the focused body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusInfo {
    pub name: String,
    pub kind: BodyKind,
    pub parent: Option<String>,
    pub distance_from_star: f64,
}

impl FocusInfo {
    /// Overlay text, e.g. `Focused: Jupiter`.
    pub fn label(&self) -> String {
        format!("Focused: {}", self.name)
    }
}

/// Selection state machine.
///
/// Selection changes only through [`FocusController::select`]; every frame
/// [`FocusController::on_frame`] re-reads the target's position from that
/// frame's output, so the published position is never from an older phase.
pub struct FocusController {
    registry: Arc<BodyRegistry>,
    state: FocusState,
    latest: FramePositions,
    revision: u64,
}

impl FocusController {
    /// Start with no selection, primed with an evaluated frame.
    pub fn new(registry: Arc<BodyRegistry>, initial: FramePositions) -> Self {
        let state = FocusState {
            target: FocusTarget::Origin,
            world_position: DVec3::ZERO,
            time: initial.time(),
        };
        Self {
            registry,
            state,
            latest: initial,
            revision: 0,
        }
    }

    /// Aim at a registered body. Unknown ids are rejected and the previous
    /// selection is kept.
    pub fn select(&mut self, id: &str) -> OrreryResult<FocusState> {
        let body = match self.registry.require(id) {
            Ok(body) => body,
            Err(err) => {
                log::warn!("Selection rejected: {err}");
                return Err(err);
            }
        };
        let position = self
            .latest
            .position(id)
            .ok_or_else(|| OrreryError::MissingPose(id.to_string()))?;

        let next = FocusState {
            target: FocusTarget::Body(body.id.clone()),
            world_position: position,
            time: self.latest.time(),
        };
        self.publish(next);
        log::info!("Focused {id}");
        Ok(self.state.clone())
    }

    /// Drop the selection and return to the origin.
    pub fn clear(&mut self) -> FocusState {
        let next = FocusState {
            target: FocusTarget::Origin,
            world_position: DVec3::ZERO,
            time: self.latest.time(),
        };
        self.publish(next);
        self.state.clone()
    }

    pub fn current(&self) -> &FocusState {
        &self.state
    }

    /// Follow the selected body into a newly evaluated frame.
    pub fn on_frame(&mut self, positions: &FramePositions) -> OrreryResult<FocusState> {
        self.latest.clone_from(positions);

        let Some(id) = self.state.target.body().cloned() else {
            self.state.time = positions.time();
            return Ok(self.state.clone());
        };
        let position = positions
            .position(id.as_str())
            .ok_or_else(|| OrreryError::MissingPose(id.to_string()))?;
        self.publish(FocusState {
            target: FocusTarget::Body(id),
            world_position: position,
            time: positions.time(),
        });
        Ok(self.state.clone())
    }

    fn publish(&mut self, next: FocusState) {
        if next.target != self.state.target || next.world_position != self.state.world_position {
            self.revision += 1;
        }
        self.state = next;
    }

    /// Bumped every time the published target or position changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Details for the info overlay. With no selection this describes the star.
    pub fn info(&self) -> FocusInfo {
        let body = match &self.state.target {
            FocusTarget::Body(id) => self.registry.get(id.as_str()),
            FocusTarget::Origin => None,
        }
        .unwrap_or_else(|| self.registry.star());

        FocusInfo {
            name: body.id.to_string(),
            kind: body.kind,
            parent: body.parent.as_ref().map(BodyId::to_string),
            distance_from_star: self.state.world_position.length(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::solar;
    use crate::kinematics::engine::{compute_positions, SpinRates};
    use crate::params::{ParameterLimits, ParameterStore, PhaseSteps};

    struct Rig {
        aimed_at: Vec<DVec3>,
    }

    impl CameraRig for Rig {
        fn retarget(&mut self, focus: &FocusState) {
            self.aimed_at.push(focus.world_position);
        }
    }

    fn setup() -> (Arc<BodyRegistry>, ParameterStore, FocusController) {
        let registry = Arc::new(solar::registry().unwrap());
        let store =
            ParameterStore::initialize(&registry, ParameterLimits::default(), PhaseSteps::default());
        let frame =
            compute_positions(0.0, &registry, &store.snapshot(), &SpinRates::default()).unwrap();
        let focus = FocusController::new(registry.clone(), frame);
        (registry, store, focus)
    }

    fn frame_at(registry: &BodyRegistry, store: &ParameterStore, t: f64) -> FramePositions {
        compute_positions(t, registry, &store.snapshot(), &SpinRates::default()).unwrap()
    }

    #[test]
    fn defaults_to_origin() {
        let (_, _, focus) = setup();
        assert_eq!(focus.current().target, FocusTarget::Origin);
        assert_eq!(focus.current().world_position, DVec3::ZERO);
        assert_eq!(focus.info().name, "Sun");
        assert_eq!(focus.info().label(), "Focused: Sun");
    }

    #[test]
    fn selected_body_tracks_each_frame() {
        let (registry, store, mut focus) = setup();
        focus.select("Jupiter").unwrap();

        let positions = frame_at(&registry, &store, 12.5);
        let state = focus.on_frame(&positions).unwrap();
        assert_eq!(Some(state.world_position), positions.position("Jupiter"));
        assert_eq!(state.time, 12.5);
        assert_eq!(focus.current().target, FocusTarget::Body(BodyId::new("Jupiter")));
    }

    #[test]
    fn select_uses_latest_frame() {
        let (registry, store, mut focus) = setup();
        let positions = frame_at(&registry, &store, 3.0);
        focus.on_frame(&positions).unwrap();
        let state = focus.select("Mars").unwrap();
        assert_eq!(Some(state.world_position), positions.position("Mars"));
    }

    #[test]
    fn unknown_selection_keeps_previous() {
        let (_, _, mut focus) = setup();
        focus.select("Saturn").unwrap();
        let before = focus.current().clone();
        let revision = focus.revision();

        let err = focus.select("Atlantis").unwrap_err();
        assert!(matches!(err, OrreryError::UnknownBody(ref id) if id == "Atlantis"));
        assert_eq!(focus.current(), &before);
        assert_eq!(focus.revision(), revision);
    }

    #[test]
    fn origin_ignores_frames() {
        let (registry, store, mut focus) = setup();
        let state = focus.on_frame(&frame_at(&registry, &store, 5.0)).unwrap();
        assert_eq!(state.world_position, DVec3::ZERO);
        assert_eq!(focus.revision(), 0);
    }

    #[test]
    fn revision_tracks_changes_and_rig_follows() {
        let (registry, store, mut focus) = setup();
        let mut rig = Rig { aimed_at: Vec::new() };
        let mut seen = focus.revision();

        focus.select("Earth").unwrap();
        for t in [1.0, 1.0, 2.0] {
            focus.on_frame(&frame_at(&registry, &store, t)).unwrap();
            if focus.revision() != seen {
                seen = focus.revision();
                rig.retarget(focus.current());
            }
        }
        // The repeated t=1.0 frame leaves the target where it was.
        assert_eq!(rig.aimed_at.len(), 2);
        assert_eq!(rig.aimed_at.last().copied(), frame_at(&registry, &store, 2.0).position("Earth"));
    }

    #[test]
    fn info_describes_moon() {
        let (_, _, mut focus) = setup();
        focus.select("Titan").unwrap();
        let info = focus.info();
        assert_eq!(info.kind, BodyKind::Moon);
        assert_eq!(info.parent.as_deref(), Some("Saturn"));
        assert!(info.distance_from_star > 0.0);
    }

    #[test]
    fn clear_returns_to_origin() {
        let (_, _, mut focus) = setup();
        focus.select("Venus").unwrap();
        let state = focus.clear();
        assert_eq!(state.target, FocusTarget::Origin);
        assert_eq!(state.world_position, DVec3::ZERO);
    }
}
