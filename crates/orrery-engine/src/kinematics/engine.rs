use std::collections::HashMap;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::api::error::{OrreryError, OrreryResult};
use crate::api::types::{BodyId, BodyKind};
use crate::catalog::registry::BodyRegistry;
use crate::kinematics::orbit::{circular_offset, spin_angle};
use crate::params::store::ParamSnapshot;

/// Self-rotation rates in rad/s, per body kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinRates {
    pub star: f64,
    pub planet: f64,
    pub moon: f64,
}

impl Default for SpinRates {
    fn default() -> Self {
        Self {
            star: 0.03,
            planet: 0.09,
            moon: 0.15,
        }
    }
}

impl SpinRates {
    pub fn for_kind(&self, kind: BodyKind) -> f64 {
        match kind {
            BodyKind::Star => self.star,
            BodyKind::Planet => self.planet,
            BodyKind::Moon => self.moon,
        }
    }
}

/// World-space placement of one body in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    pub position: DVec3,
    /// Rotation about the body's own y axis, radians.
    pub spin: f64,
}

/// Output of one frame evaluation: a pose for every body, in evaluation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FramePositions {
    time: f64,
    poses: HashMap<BodyId, BodyPose>,
    order: Vec<BodyId>,
}

impl FramePositions {
    pub fn new(time: f64) -> Self {
        Self {
            time,
            ..Default::default()
        }
    }

    /// Record a pose. Re-inserting an id replaces its pose in place.
    pub fn insert(&mut self, id: BodyId, pose: BodyPose) {
        if self.poses.insert(id.clone(), pose).is_none() {
            self.order.push(id);
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn get(&self, id: &str) -> Option<&BodyPose> {
        self.poses.get(id)
    }

    pub fn position(&self, id: &str) -> Option<DVec3> {
        self.poses.get(id).map(|pose| pose.position)
    }

    /// Poses in evaluation order (star, planets, moons).
    pub fn iter(&self) -> impl Iterator<Item = (&BodyId, &BodyPose)> {
        self.order.iter().filter_map(move |id| self.poses.get(id).map(|pose| (id, pose)))
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

/// Evaluate every body's pose at `time`.
///
/// Bodies are visited star first, then planets, then moons, so each moon is
/// placed relative to its parent's pose from this same evaluation. Pure:
/// the same inputs always produce the same output.
pub fn compute_positions(
    time: f64,
    registry: &BodyRegistry,
    params: &ParamSnapshot,
    spin: &SpinRates,
) -> OrreryResult<FramePositions> {
    if !time.is_finite() || time < 0.0 {
        return Err(OrreryError::InvalidTime(time));
    }

    let mut frame = FramePositions::new(time);
    for body in registry.evaluation_order() {
        let p = params.require(body.id.as_str())?;

        let position = match body.kind {
            BodyKind::Star => DVec3::ZERO,
            BodyKind::Planet => circular_offset(p.radius, p.angular_speed, p.phase_offset, time),
            BodyKind::Moon => {
                let unresolved = |parent: &str| OrreryError::HierarchyResolution {
                    body: body.id.to_string(),
                    parent: parent.to_string(),
                };
                let parent_id = body.parent.as_ref().ok_or_else(|| unresolved("<none>"))?;
                let parent_pose = frame
                    .get(parent_id.as_str())
                    .ok_or_else(|| unresolved(parent_id.as_str()))?;
                let parent_params = params.require(parent_id.as_str())?;

                let offset = parent_params.visual_size + p.radius;
                parent_pose.position + circular_offset(offset, p.angular_speed, p.phase_offset, time)
            }
        };

        frame.insert(
            body.id.clone(),
            BodyPose {
                position,
                spin: spin_angle(spin.for_kind(body.kind), time),
            },
        );
    }

    log::trace!("evaluated {} poses at t={time:.3}", frame.len());
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Rgb;
    use crate::catalog::body::CelestialBody;
    use crate::catalog::solar;
    use crate::params::limits::ParameterLimits;
    use crate::params::store::{OrbitalParameters, ParameterStore, PhaseSteps};
    use crate::params::ParamField;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    const GREY: Rgb = Rgb::new(0x88, 0x88, 0x88);

    fn store_for(registry: &BodyRegistry) -> ParameterStore {
        ParameterStore::initialize(registry, ParameterLimits::default(), PhaseSteps::default())
    }

    fn two_body() -> BodyRegistry {
        BodyRegistry::new(vec![
            CelestialBody::star("Sol", 3.0, GREY),
            CelestialBody::planet("Tenth", "Sol", 1.0, 10.0, 1.0, GREY),
        ])
        .unwrap()
    }

    #[test]
    fn planet_starts_on_x_axis_and_quarter_turns_to_z() {
        let registry = two_body();
        let snap = store_for(&registry).snapshot();
        let rates = SpinRates::default();

        let p0 = compute_positions(0.0, &registry, &snap, &rates).unwrap();
        let pos = p0.position("Tenth").unwrap();
        assert_relative_eq!(pos.x, 10.0);
        assert_eq!(pos.y, 0.0);
        assert_relative_eq!(pos.z, 0.0);

        let p1 = compute_positions(FRAC_PI_2, &registry, &snap, &rates).unwrap();
        let pos = p1.position("Tenth").unwrap();
        assert_relative_eq!(pos.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(pos.z, 10.0, epsilon = 1e-12);
        assert_eq!(p1.position("Sol"), Some(DVec3::ZERO));
    }

    #[test]
    fn planets_stay_on_their_radius() {
        let registry = solar::registry().unwrap();
        let snap = store_for(&registry).snapshot();
        for t in [0.0, 0.5, 17.0, 1234.5] {
            let frame = compute_positions(t, &registry, &snap, &SpinRates::default()).unwrap();
            for planet in registry.planets() {
                let radius = snap.get(planet.id.as_str()).unwrap().radius;
                let d = frame.position(planet.id.as_str()).unwrap().length();
                assert_relative_eq!(d, radius, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn moons_keep_offset_from_same_frame_parent() {
        let registry = solar::registry().unwrap();
        let snap = store_for(&registry).snapshot();
        let frame = compute_positions(42.0, &registry, &snap, &SpinRates::default()).unwrap();

        for moon in registry.bodies().iter().filter(|b| b.kind == BodyKind::Moon) {
            let parent = moon.parent.as_ref().unwrap().as_str();
            let expected = snap.get(parent).unwrap().visual_size + snap.get(moon.id.as_str()).unwrap().radius;
            let d = frame.position(moon.id.as_str()).unwrap() - frame.position(parent).unwrap();
            assert_relative_eq!(d.length(), expected, epsilon = 1e-9);
            assert_relative_eq!(d.y, 0.0);
        }
    }

    #[test]
    fn sibling_moons_share_parent_position() {
        let registry = solar::registry().unwrap();
        let store = store_for(&registry);
        let t = 7.25;

        // Move Mars between frames: both moons must follow the new position.
        let before = compute_positions(t, &registry, &store.snapshot(), &SpinRates::default()).unwrap();
        store.update("Mars", ParamField::Radius, 60.0.into()).unwrap();
        let snap = store.snapshot();
        let frame = compute_positions(t, &registry, &snap, &SpinRates::default()).unwrap();

        let mars = frame.position("Mars").unwrap();
        assert_ne!(mars, before.position("Mars").unwrap());
        let mars_size = snap.get("Mars").unwrap().visual_size;
        for moon in ["Phobos", "Deimos"] {
            let r = snap.get(moon).unwrap().radius;
            let d = (frame.position(moon).unwrap() - mars).length();
            assert_relative_eq!(d, mars_size + r, epsilon = 1e-9);
        }
    }

    #[test]
    fn evaluation_is_idempotent() {
        let registry = solar::registry().unwrap();
        let snap = store_for(&registry).snapshot();
        let a = compute_positions(99.9, &registry, &snap, &SpinRates::default()).unwrap();
        let b = compute_positions(99.9, &registry, &snap, &SpinRates::default()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), registry.len());
    }

    #[test]
    fn iteration_follows_hierarchy_depth() {
        let registry = solar::registry().unwrap();
        let snap = store_for(&registry).snapshot();
        let frame = compute_positions(1.0, &registry, &snap, &SpinRates::default()).unwrap();
        let depths: Vec<usize> = frame
            .iter()
            .map(|(id, _)| registry.get(id.as_str()).unwrap().kind.depth())
            .collect();
        assert!(depths.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(frame.iter().next().unwrap().0.as_str(), "Sun");
    }

    #[test]
    fn spin_grows_with_time() {
        let registry = two_body();
        let snap = store_for(&registry).snapshot();
        let rates = SpinRates::default();
        let a = compute_positions(1.0, &registry, &snap, &rates).unwrap();
        let b = compute_positions(2.0, &registry, &snap, &rates).unwrap();
        assert!(b.get("Sol").unwrap().spin > a.get("Sol").unwrap().spin);
        assert_relative_eq!(b.get("Tenth").unwrap().spin, 2.0 * rates.planet);
    }

    #[test]
    fn rejects_negative_or_non_finite_time() {
        let registry = two_body();
        let snap = store_for(&registry).snapshot();
        for t in [-1.0, f64::NAN, f64::INFINITY] {
            let err = compute_positions(t, &registry, &snap, &SpinRates::default()).unwrap_err();
            assert!(matches!(err, OrreryError::InvalidTime(_)));
        }
    }

    #[test]
    fn missing_parameters_are_not_defaulted() {
        let registry = two_body();
        let mut snap = ParamSnapshot::default();
        snap.insert(
            "Sol",
            OrbitalParameters {
                radius: 0.0,
                angular_speed: 0.0,
                phase_offset: 0.0,
                visual_size: 3.0,
                tint: GREY,
            },
        );
        let err = compute_positions(0.0, &registry, &snap, &SpinRates::default()).unwrap_err();
        assert!(matches!(err, OrreryError::UnknownBody(ref id) if id == "Tenth"));
    }
}
