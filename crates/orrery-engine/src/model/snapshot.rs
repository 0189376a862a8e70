use std::collections::HashSet;
use std::fmt;

use crate::api::types::BodyId;
use crate::model::body::{AuxiliaryRecord, Body, BodyKind};

/// Most dust particles one belt may ask for.
pub const MAX_BELT_PARTICLES: u32 = 1_000_000;
/// Most rocks one belt may ask for, main and outer belt combined.
pub const MAX_BELT_ROCKS: u32 = 10_000;

/// Why a snapshot was refused at the ingestion boundary.
#[derive(Debug)]
pub enum SnapshotError {
    Parse(serde_json::Error),
    DuplicateId(BodyId),
    NonPositiveRadius(BodyId),
    MissingOrbit(BodyId),
    /// Eccentricity outside [0, 1).
    UnboundOrbit { id: BodyId, eccentricity: f64 },
    NonPositiveSemiMajorAxis(BodyId),
    NonPositivePeriod(BodyId),
    NonFiniteElement(BodyId),
    InvalidRings(BodyId),
    MissingBelt(BodyId),
    InvalidBelt(BodyId),
    /// Particle or rock count above the per-belt limit.
    OversizedBelt { id: BodyId, particles: u32, rocks: u64 },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Parse(e) => write!(f, "snapshot is not valid JSON: {e}"),
            SnapshotError::DuplicateId(id) => write!(f, "body id {id:?} appears more than once"),
            SnapshotError::NonPositiveRadius(id) => write!(f, "body {id:?} has a non-positive radius"),
            SnapshotError::MissingOrbit(id) => write!(f, "orbiting body {id:?} has no orbital elements"),
            SnapshotError::UnboundOrbit { id, eccentricity } => {
                write!(f, "body {id:?} has eccentricity {eccentricity}, expected [0, 1)")
            }
            SnapshotError::NonPositiveSemiMajorAxis(id) => {
                write!(f, "body {id:?} has a non-positive semi-major axis")
            }
            SnapshotError::NonPositivePeriod(id) => write!(f, "body {id:?} has a non-positive orbital period"),
            SnapshotError::NonFiniteElement(id) => write!(f, "body {id:?} has a non-finite orbital element"),
            SnapshotError::InvalidRings(id) => write!(f, "body {id:?} has rings with inner >= outer radius"),
            SnapshotError::MissingBelt(id) => write!(f, "region {id:?} has no belt description"),
            SnapshotError::InvalidBelt(id) => write!(f, "region {id:?} has a belt with invalid edges"),
            SnapshotError::OversizedBelt { id, particles, rocks } => write!(
                f,
                "region {id:?} asks for {particles} particles and {rocks} rocks, \
                 limits are {MAX_BELT_PARTICLES} and {MAX_BELT_ROCKS}"
            ),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        SnapshotError::Parse(e)
    }
}

/// A validated list of bodies: the single source of truth for one render pass.
///
/// The only way to build one is through [`Snapshot::new`] or [`Snapshot::from_json`],
/// both of which validate, so the solver never sees unbound or degenerate orbits.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    bodies: Vec<Body>,
}

impl Snapshot {
    /// Validate a body list and wrap it.
    pub fn new(bodies: Vec<Body>) -> Result<Self, SnapshotError> {
        validate(&bodies)?;
        Ok(Self { bodies })
    }

    /// Parse a JSON array of bodies and validate it.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let bodies: Vec<Body> = serde_json::from_str(json)?;
        Self::new(bodies)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn get(&self, id: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn into_bodies(self) -> Vec<Body> {
        self.bodies
    }

    /// Merge auxiliary records into one body's list.
    /// Returns how many were new, or `None` if no body has that id.
    pub fn merge_auxiliary(
        &mut self,
        id: &str,
        incoming: impl IntoIterator<Item = AuxiliaryRecord>,
    ) -> Option<usize> {
        let body = self.bodies.iter_mut().find(|b| b.id == id)?;
        Some(merge_auxiliary(&mut body.auxiliary, incoming))
    }
}

/// Check every body invariant. Stops at the first violation.
pub fn validate(bodies: &[Body]) -> Result<(), SnapshotError> {
    let mut seen = HashSet::with_capacity(bodies.len());
    for body in bodies {
        if !seen.insert(&body.id) {
            return Err(SnapshotError::DuplicateId(body.id.clone()));
        }
        validate_body(body)?;
    }
    Ok(())
}

fn validate_body(body: &Body) -> Result<(), SnapshotError> {
    let id = || body.id.clone();

    if !(body.radius > 0.0) {
        return Err(SnapshotError::NonPositiveRadius(id()));
    }

    if body.kind.is_orbiting() {
        let el = body.orbit.as_ref().ok_or_else(|| SnapshotError::MissingOrbit(id()))?;
        let angles = [
            el.inclination_deg,
            el.ascending_node_deg,
            el.periapsis_longitude_deg,
            el.mean_longitude_deg,
        ];
        if angles.iter().any(|a| !a.is_finite()) {
            return Err(SnapshotError::NonFiniteElement(id()));
        }
        if !(0.0..1.0).contains(&el.eccentricity) {
            return Err(SnapshotError::UnboundOrbit { id: id(), eccentricity: el.eccentricity });
        }
        if !(el.semi_major_axis > 0.0) || !el.semi_major_axis.is_finite() {
            return Err(SnapshotError::NonPositiveSemiMajorAxis(id()));
        }
        if !(el.orbital_period_years > 0.0) || !el.orbital_period_years.is_finite() {
            return Err(SnapshotError::NonPositivePeriod(id()));
        }
    }

    if let Some(rings) = &body.rings {
        if !(rings.inner_radius >= 0.0 && rings.inner_radius < rings.outer_radius) {
            return Err(SnapshotError::InvalidRings(id()));
        }
    }

    if body.kind == BodyKind::Region {
        let belt = body.belt.as_ref().ok_or_else(|| SnapshotError::MissingBelt(id()))?;
        let edges_ok = |inner: f64, outer: f64| inner >= 0.0 && inner < outer && outer.is_finite();
        let trojan_ok = belt.trojan_au.map_or(true, |au| au.is_finite() && au > 0.0);
        let outer_ok = belt.outer.as_ref().map_or(true, |o| edges_ok(o.inner_au, o.outer_au));
        if !(edges_ok(belt.inner_au, belt.outer_au) && trojan_ok && outer_ok) {
            return Err(SnapshotError::InvalidBelt(id()));
        }
        let rocks = u64::from(belt.rocks) + belt.outer.as_ref().map_or(0, |o| u64::from(o.rocks));
        if belt.particles > MAX_BELT_PARTICLES || rocks > u64::from(MAX_BELT_ROCKS) {
            return Err(SnapshotError::OversizedBelt { id: id(), particles: belt.particles, rocks });
        }
    }

    Ok(())
}

/// Append `incoming` records whose id is not already present. Existing order is kept.
pub fn merge_auxiliary(existing: &mut Vec<AuxiliaryRecord>, incoming: impl IntoIterator<Item = AuxiliaryRecord>) -> usize {
    let mut ids: HashSet<String> = existing.iter().map(|r| r.id.clone()).collect();
    let before = existing.len();
    for record in incoming {
        if ids.insert(record.id.clone()) {
            existing.push(record);
        }
    }
    existing.len() - before
}
