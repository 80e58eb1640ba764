use std::collections::HashMap;

use crate::api::error::{OrreryError, OrreryResult, RegistryDefect};
use crate::api::types::{BodyId, BodyKind};
use crate::catalog::body::CelestialBody;
use crate::catalog::manifest::CatalogManifest;

/// Validated, immutable catalog of celestial bodies.
///
/// Construction enforces the hierarchy: exactly one star, every planet orbits
/// the star, every moon orbits a planet. That caps depth at two and rules out
/// cycles. The depth-ordered evaluation sequence is computed once here.
#[derive(Debug, Clone)]
pub struct BodyRegistry {
    bodies: Vec<CelestialBody>,
    index: HashMap<BodyId, usize>,
    /// Indices into `bodies`, star first, then planets, then moons.
    order: Vec<usize>,
    /// Position in `order` per catalog index.
    rank: Vec<usize>,
    /// Moon indices per planet index, in catalog order.
    children: HashMap<usize, Vec<usize>>,
    star: usize,
}

impl BodyRegistry {
    /// Build a registry from a flat body list, failing fast on any defect.
    pub fn new(bodies: Vec<CelestialBody>) -> OrreryResult<Self> {
        let mut index = HashMap::with_capacity(bodies.len());
        let mut star: Option<usize> = None;

        for (i, body) in bodies.iter().enumerate() {
            if body.id.as_str().trim().is_empty() {
                return Err(RegistryDefect::EmptyId.into());
            }
            if index.insert(body.id.clone(), i).is_some() {
                return Err(RegistryDefect::DuplicateId(body.id.to_string()).into());
            }
            check_base_values(body)?;
            if body.kind == BodyKind::Star {
                if let Some(first) = star {
                    return Err(RegistryDefect::MultipleStars(
                        bodies[first].id.to_string(),
                        body.id.to_string(),
                    )
                    .into());
                }
                star = Some(i);
            }
        }
        let star = star.ok_or(RegistryDefect::MissingStar)?;

        let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
        for (i, body) in bodies.iter().enumerate() {
            let (parent_kind, parent_id) = match (body.kind.parent_kind(), body.parent.as_ref()) {
                (None, None) => continue,
                (None, Some(_)) => {
                    return Err(RegistryDefect::StarWithParent(body.id.to_string()).into())
                }
                (Some(_), None) => {
                    return Err(RegistryDefect::MissingParent(body.id.to_string()).into())
                }
                (Some(kind), Some(parent)) => (kind, parent.as_str()),
            };
            let Some(&p) = index.get(parent_id) else {
                return Err(RegistryDefect::OrphanedParent {
                    body: body.id.to_string(),
                    parent: parent_id.to_string(),
                }
                .into());
            };
            let parent = &bodies[p];
            if parent.kind != parent_kind {
                return Err(RegistryDefect::WrongParentKind {
                    body: body.id.to_string(),
                    kind: body.kind,
                    parent: parent.id.to_string(),
                    parent_kind: parent.kind,
                }
                .into());
            }
            if body.kind == BodyKind::Moon {
                children.entry(p).or_default().push(i);
            }
        }

        // Stable sort keeps catalog order within each depth.
        let mut order: Vec<usize> = (0..bodies.len()).collect();
        order.sort_by_key(|&i| bodies[i].kind.depth());
        let mut rank = vec![0; bodies.len()];
        for (position, &i) in order.iter().enumerate() {
            rank[i] = position;
        }

        log::info!(
            "body registry: {} bodies ({} moons)",
            bodies.len(),
            children.values().map(Vec::len).sum::<usize>()
        );

        Ok(Self {
            bodies,
            index,
            order,
            rank,
            children,
            star,
        })
    }

    /// Build a registry from a parsed catalog manifest.
    pub fn from_manifest(manifest: &CatalogManifest) -> OrreryResult<Self> {
        Self::new(manifest.to_bodies())
    }

    /// Parse a JSON catalog manifest and validate it.
    pub fn from_json(json: &str) -> OrreryResult<Self> {
        let manifest = CatalogManifest::from_json(json).map_err(OrreryError::Manifest)?;
        Self::from_manifest(&manifest)
    }

    /// All bodies in catalog order.
    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    /// Bodies in hierarchy-depth order: the star, all planets, all moons.
    pub fn evaluation_order(&self) -> impl Iterator<Item = &CelestialBody> {
        self.order.iter().map(move |&i| &self.bodies[i])
    }

    /// Position of a body in [`evaluation_order`](Self::evaluation_order).
    /// This is the index space of the scene's body instances.
    pub fn evaluation_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).map(|&i| self.rank[i])
    }

    /// The body at a position in evaluation order.
    pub fn evaluation_body(&self, position: usize) -> Option<&CelestialBody> {
        self.order.get(position).map(|&i| &self.bodies[i])
    }

    /// Look up a body by id.
    pub fn get(&self, id: &str) -> Option<&CelestialBody> {
        self.index.get(id).map(|&i| &self.bodies[i])
    }

    /// Look up a body by id, failing with `UnknownBody`.
    pub fn require(&self, id: &str) -> OrreryResult<&CelestialBody> {
        self.get(id)
            .ok_or_else(|| OrreryError::UnknownBody(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Catalog position of a body.
    pub fn ordinal(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn star(&self) -> &CelestialBody {
        &self.bodies[self.star]
    }

    /// Planets in catalog order.
    pub fn planets(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter().filter(|b| b.kind == BodyKind::Planet)
    }

    /// Moons of a planet in catalog order. Empty for unknown ids and non-planets.
    pub fn children(&self, id: &str) -> impl Iterator<Item = &CelestialBody> {
        self.index
            .get(id)
            .and_then(|i| self.children.get(i))
            .into_iter()
            .flatten()
            .map(move |&i| &self.bodies[i])
    }

    /// Index of a moon among its parent's moons, or of a planet among all planets.
    pub fn sibling_index(&self, id: &str) -> Option<usize> {
        let body = self.get(id)?;
        match body.kind {
            BodyKind::Star => Some(0),
            BodyKind::Planet => self.planets().position(|p| p.id == body.id),
            BodyKind::Moon => {
                let parent = body.parent.as_ref()?;
                self.children(parent.as_str()).position(|m| m.id == body.id)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

fn check_base_values(body: &CelestialBody) -> Result<(), RegistryDefect> {
    let invalid = |quantity: &'static str, value: f64| RegistryDefect::InvalidBaseValue {
        body: body.id.to_string(),
        quantity,
        value,
    };
    if !(body.base_radius.is_finite() && body.base_radius > 0.0) {
        return Err(invalid("radius", body.base_radius));
    }
    if !body.base_angular_speed.is_finite() {
        return Err(invalid("angular speed", body.base_angular_speed));
    }
    let orbit = body.base_orbit_radius;
    let orbit_ok = match body.kind {
        BodyKind::Star => orbit.is_finite() && orbit >= 0.0,
        BodyKind::Planet | BodyKind::Moon => orbit.is_finite() && orbit > 0.0,
    };
    if !orbit_ok {
        return Err(invalid("orbit radius", orbit));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Rgb;

    const GREY: Rgb = Rgb::new(0x88, 0x88, 0x88);

    fn sun() -> CelestialBody {
        CelestialBody::star("Sun", 3.2, GREY)
    }

    fn defect(bodies: Vec<CelestialBody>) -> RegistryDefect {
        match BodyRegistry::new(bodies) {
            Err(OrreryError::RegistryInvalid(d)) => d,
            other => panic!("expected RegistryInvalid, got {other:?}"),
        }
    }

    #[test]
    fn evaluation_order_is_depth_first_by_kind() {
        // Moon declared before its planet on purpose.
        let reg = BodyRegistry::new(vec![
            CelestialBody::moon("Moon", "Earth", 0.27, 2.0, 1.5, GREY),
            CelestialBody::planet("Earth", "Sun", 1.0, 20.0, 0.15, GREY),
            sun(),
            CelestialBody::planet("Mars", "Sun", 0.53, 27.0, 0.13, GREY),
        ])
        .unwrap();

        let order: Vec<&str> = reg.evaluation_order().map(|b| b.id.as_str()).collect();
        assert_eq!(order, ["Sun", "Earth", "Mars", "Moon"]);
        // Catalog order is preserved for bodies().
        assert_eq!(reg.bodies()[0].id.as_str(), "Moon");
        assert_eq!(reg.star().id.as_str(), "Sun");
    }

    #[test]
    fn evaluation_index_matches_evaluation_order() {
        let reg = BodyRegistry::new(vec![
            sun(),
            CelestialBody::planet("Earth", "Sun", 1.0, 20.0, 0.15, GREY),
            CelestialBody::moon("Moon", "Earth", 0.27, 2.0, 1.5, GREY),
            CelestialBody::planet("Mars", "Sun", 0.53, 27.0, 0.13, GREY),
        ])
        .unwrap();

        for (position, body) in reg.evaluation_order().enumerate() {
            assert_eq!(reg.evaluation_index(body.id.as_str()), Some(position));
            assert_eq!(reg.evaluation_body(position).map(|b| &b.id), Some(&body.id));
        }
        // Catalog order interleaves the moon; evaluation order puts it last.
        assert_eq!(reg.ordinal("Mars"), Some(3));
        assert_eq!(reg.evaluation_index("Mars"), Some(2));
        assert_eq!(reg.evaluation_index("Moon"), Some(3));
        assert!(reg.evaluation_body(4).is_none());
        assert!(reg.evaluation_index("Atlantis").is_none());
    }

    #[test]
    fn children_and_sibling_indices() {
        let reg = BodyRegistry::new(vec![
            sun(),
            CelestialBody::planet("Mars", "Sun", 0.53, 27.0, 0.13, GREY),
            CelestialBody::moon("Phobos", "Mars", 0.11, 1.2, 2.5, GREY),
            CelestialBody::moon("Deimos", "Mars", 0.06, 1.7, 1.2, GREY),
        ])
        .unwrap();

        let moons: Vec<&str> = reg.children("Mars").map(|b| b.id.as_str()).collect();
        assert_eq!(moons, ["Phobos", "Deimos"]);
        assert_eq!(reg.sibling_index("Deimos"), Some(1));
        assert_eq!(reg.sibling_index("Mars"), Some(0));
        assert_eq!(reg.children("Sun").count(), 0);
        assert_eq!(reg.children("Atlantis").count(), 0);
    }

    #[test]
    fn require_reports_unknown_body() {
        let reg = BodyRegistry::new(vec![sun()]).unwrap();
        assert!(matches!(reg.require("Atlantis"), Err(OrreryError::UnknownBody(id)) if id == "Atlantis"));
        assert!(reg.require("Sun").is_ok());
    }

    #[test]
    fn rejects_orphaned_moon() {
        let d = defect(vec![
            sun(),
            CelestialBody::moon("Phobos", "Ares", 0.11, 1.2, 2.5, GREY),
        ]);
        assert_eq!(
            d,
            RegistryDefect::OrphanedParent {
                body: "Phobos".into(),
                parent: "Ares".into()
            }
        );
    }

    #[test]
    fn rejects_moon_of_moon() {
        let d = defect(vec![
            sun(),
            CelestialBody::planet("Earth", "Sun", 1.0, 20.0, 0.15, GREY),
            CelestialBody::moon("Moon", "Earth", 0.27, 2.0, 1.5, GREY),
            CelestialBody::moon("Moonmoon", "Moon", 0.05, 0.5, 1.0, GREY),
        ]);
        assert!(matches!(d, RegistryDefect::WrongParentKind { ref body, .. } if body == "Moonmoon"));
    }

    #[test]
    fn rejects_self_parented_planet() {
        let d = defect(vec![
            sun(),
            CelestialBody::planet("Ouroboros", "Ouroboros", 1.0, 20.0, 0.1, GREY),
        ]);
        assert!(matches!(d, RegistryDefect::WrongParentKind { .. }));
    }

    #[test]
    fn rejects_moon_orbiting_star() {
        let d = defect(vec![sun(), CelestialBody::moon("Moon", "Sun", 0.27, 2.0, 1.5, GREY)]);
        assert!(matches!(d, RegistryDefect::WrongParentKind { kind: BodyKind::Moon, .. }));
    }

    #[test]
    fn rejects_star_problems() {
        assert_eq!(
            defect(vec![CelestialBody::planet("Earth", "Sun", 1.0, 20.0, 0.15, GREY)]),
            RegistryDefect::MissingStar
        );
        assert_eq!(
            defect(vec![sun(), CelestialBody::star("Sirius", 2.0, GREY)]),
            RegistryDefect::MultipleStars("Sun".into(), "Sirius".into())
        );
        let mut parented = sun();
        parented.parent = Some(BodyId::new("Sun"));
        assert_eq!(defect(vec![parented]), RegistryDefect::StarWithParent("Sun".into()));
    }

    #[test]
    fn rejects_duplicates_and_bad_values() {
        assert_eq!(
            defect(vec![sun(), sun()]),
            RegistryDefect::DuplicateId("Sun".into())
        );
        assert_eq!(defect(vec![CelestialBody::star(" ", 1.0, GREY)]), RegistryDefect::EmptyId);

        let d = defect(vec![
            sun(),
            CelestialBody::planet("Earth", "Sun", 1.0, -20.0, 0.15, GREY),
        ]);
        assert!(matches!(d, RegistryDefect::InvalidBaseValue { quantity: "orbit radius", .. }));

        let d = defect(vec![
            sun(),
            CelestialBody::planet("Earth", "Sun", 1.0, 20.0, f64::NAN, GREY),
        ]);
        assert!(matches!(d, RegistryDefect::InvalidBaseValue { quantity: "angular speed", .. }));
    }

    #[test]
    fn planet_without_parent_is_rejected() {
        let mut earth = CelestialBody::planet("Earth", "Sun", 1.0, 20.0, 0.15, GREY);
        earth.parent = None;
        assert_eq!(defect(vec![sun(), earth]), RegistryDefect::MissingParent("Earth".into()));
    }

    #[test]
    fn from_json_surfaces_manifest_errors() {
        assert!(matches!(BodyRegistry::from_json("{"), Err(OrreryError::Manifest(_))));

        let json = r##"{
            "star": { "name": "Sun", "size": 3.2, "color": "#fff26b" },
            "planets": [ { "name": "Sun", "size": 1, "orbit": 10, "speed": 0.2 } ]
        }"##;
        assert!(matches!(
            BodyRegistry::from_json(json),
            Err(OrreryError::RegistryInvalid(RegistryDefect::DuplicateId(_)))
        ));
    }
}
