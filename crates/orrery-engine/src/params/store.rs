use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::api::error::{OrreryError, OrreryResult};
use crate::api::types::{BodyId, BodyKind, Rgb};
use crate::catalog::body::CelestialBody;
use crate::catalog::registry::BodyRegistry;
use crate::params::field::{ParamField, ParamValue};
use crate::params::limits::{ParameterLimits, ValidEdit};

/// Phase offset increments used to spread bodies around their orbits at t=0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseSteps {
    /// Radians per planet ordinal.
    pub planet: f64,
    /// Radians per moon sibling index.
    pub moon: f64,
}

impl Default for PhaseSteps {
    fn default() -> Self {
        Self { planet: 0.55, moon: 0.7 }
    }
}

/// Live, editable orbital state of one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalParameters {
    pub radius: f64,
    /// rad/s, negative for retrograde.
    pub angular_speed: f64,
    pub phase_offset: f64,
    pub visual_size: f64,
    pub tint: Rgb,
}

impl OrbitalParameters {
    pub fn from_body(body: &CelestialBody, phase_offset: f64) -> Self {
        Self {
            radius: body.base_orbit_radius,
            angular_speed: body.base_angular_speed,
            phase_offset,
            visual_size: body.base_radius,
            tint: body.fallback_color,
        }
    }

    pub fn value(&self, field: ParamField) -> ParamValue {
        match field {
            ParamField::Radius => ParamValue::Scalar(self.radius),
            ParamField::AngularSpeed => ParamValue::Scalar(self.angular_speed),
            ParamField::VisualSize => ParamValue::Scalar(self.visual_size),
            ParamField::TintColor => ParamValue::Color(self.tint),
        }
    }

    fn apply(&mut self, edit: ValidEdit) {
        match edit {
            ValidEdit::Radius(v) => self.radius = v,
            ValidEdit::AngularSpeed(v) => self.angular_speed = v,
            ValidEdit::VisualSize(v) => self.visual_size = v,
            ValidEdit::Tint(c) => self.tint = c,
        }
    }
}

/// Whether a field can be edited on a body of the given kind.
/// The star sits at the origin, so it has no orbit to edit.
pub fn is_editable(kind: BodyKind, field: ParamField) -> bool {
    !matches!(
        (kind, field),
        (BodyKind::Star, ParamField::Radius | ParamField::AngularSpeed)
    )
}

struct Entry {
    kind: BodyKind,
    initial: OrbitalParameters,
    live: RwLock<OrbitalParameters>,
}

/// Owns the live parameters of every registered body.
///
/// The set of bodies is fixed at construction; each body's parameters sit
/// behind their own lock, so an edit never exposes a half-written record to
/// a concurrent reader. Edits only need `&self`.
pub struct ParameterStore {
    entries: HashMap<BodyId, Entry>,
    order: Vec<BodyId>,
    limits: ParameterLimits,
    revision: AtomicU64,
}

impl ParameterStore {
    /// Seed parameters from the catalog base values.
    ///
    /// Planets get `ordinal * phases.planet`, moons `sibling_index * phases.moon`.
    pub fn initialize(registry: &BodyRegistry, limits: ParameterLimits, phases: PhaseSteps) -> Self {
        let mut entries = HashMap::with_capacity(registry.len());
        let mut order = Vec::with_capacity(registry.len());
        let mut planet_count = 0usize;
        let mut moon_counts: HashMap<&str, usize> = HashMap::new();

        for body in registry.bodies() {
            let phase = match (body.kind, body.parent.as_ref()) {
                (BodyKind::Planet, _) => {
                    let phase = planet_count as f64 * phases.planet;
                    planet_count += 1;
                    phase
                }
                (BodyKind::Moon, Some(parent)) => {
                    let count = moon_counts.entry(parent.as_str()).or_insert(0);
                    let phase = *count as f64 * phases.moon;
                    *count += 1;
                    phase
                }
                _ => 0.0,
            };

            let params = OrbitalParameters::from_body(body, phase);
            order.push(body.id.clone());
            entries.insert(
                body.id.clone(),
                Entry { kind: body.kind, initial: params, live: RwLock::new(params) },
            );
        }

        log::debug!("Parameter store seeded for {} bodies", entries.len());
        Self { entries, order, limits, revision: AtomicU64::new(0) }
    }

    fn entry(&self, id: &str) -> OrreryResult<&Entry> {
        self.entries
            .get(id)
            .ok_or_else(|| OrreryError::UnknownBody(id.to_string()))
    }

    pub fn get(&self, id: &str) -> OrreryResult<OrbitalParameters> {
        Ok(*self.entry(id)?.live.read())
    }

    pub fn kind(&self, id: &str) -> OrreryResult<BodyKind> {
        Ok(self.entry(id)?.kind)
    }

    /// Validate and apply one edit. Rejected edits leave the stored value untouched.
    pub fn update(&self, id: &str, field: ParamField, value: ParamValue) -> OrreryResult<()> {
        let entry = self.entry(id)?;

        if !is_editable(entry.kind, field) {
            log::warn!("Rejected edit {id}.{field}: not editable on a {}", entry.kind);
            return Err(OrreryError::FieldNotEditable { body: id.to_string(), field });
        }

        let edit = self.limits.validate(entry.kind, field, value).map_err(|reason| {
            log::warn!("Rejected edit {id}.{field} = {value}: {reason}");
            OrreryError::ParameterRange { body: id.to_string(), field, reason }
        })?;

        entry.live.write().apply(edit);
        self.revision.fetch_add(1, Ordering::AcqRel);
        log::debug!("{id}.{field} = {value}");
        Ok(())
    }

    /// Copy of all current parameters. Each body is copied under its lock.
    pub fn snapshot(&self) -> ParamSnapshot {
        let revision = self.revision.load(Ordering::Acquire);
        let values = self
            .entries
            .iter()
            .map(|(id, entry)| (id.clone(), *entry.live.read()))
            .collect();
        ParamSnapshot { values, revision }
    }

    /// Restore one body to its seeded values.
    pub fn reset(&self, id: &str) -> OrreryResult<()> {
        let entry = self.entry(id)?;
        *entry.live.write() = entry.initial;
        self.revision.fetch_add(1, Ordering::AcqRel);
        log::debug!("Reset parameters of {id}");
        Ok(())
    }

    pub fn reset_all(&self) {
        for entry in self.entries.values() {
            *entry.live.write() = entry.initial;
        }
        self.revision.fetch_add(1, Ordering::AcqRel);
        log::info!("Reset parameters of all {} bodies", self.entries.len());
    }

    /// Number of accepted edits and resets so far.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    pub fn limits(&self) -> &ParameterLimits {
        &self.limits
    }

    /// Body ids in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &BodyId> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Point-in-time copy of all body parameters, consumed by position evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSnapshot {
    values: HashMap<BodyId, OrbitalParameters>,
    revision: u64,
}

impl ParamSnapshot {
    pub fn get(&self, id: &str) -> Option<&OrbitalParameters> {
        self.values.get(id)
    }

    pub fn require(&self, id: &str) -> OrreryResult<&OrbitalParameters> {
        self.values
            .get(id)
            .ok_or_else(|| OrreryError::UnknownBody(id.to_string()))
    }

    /// Insert or replace a body's parameters; used by custom drivers and tests.
    pub fn insert(&mut self, id: impl Into<BodyId>, params: OrbitalParameters) {
        self.values.insert(id.into(), params);
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BodyId, &OrbitalParameters)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
