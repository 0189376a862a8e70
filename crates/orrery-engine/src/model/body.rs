use std::fmt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::types::BodyId;

/// Category of a celestial body. Drives geometry, coloring and whether an orbit path is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Star,
    Planet,
    Comet,
    Asteroid,
    /// A belt of particles and loose rocks, clickable as one body.
    Region,
}

impl BodyKind {
    /// Kinds that move along Keplerian orbits and get an orbit path.
    pub fn is_orbiting(self) -> bool {
        matches!(self, BodyKind::Planet | BodyKind::Comet | BodyKind::Asteroid)
    }

    /// Comets and asteroids: irregular geometry, muted orbit paths, no glow.
    pub fn is_small_body(self) -> bool {
        matches!(self, BodyKind::Comet | BodyKind::Asteroid)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BodyKind::Star => "star",
            BodyKind::Planet => "planet",
            BodyKind::Comet => "comet",
            BodyKind::Asteroid => "asteroid",
            BodyKind::Region => "region",
        }
    }
}

/// Linear RGB color, written as `#RRGGBB` in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
        }
    }

    pub fn to_hex(self) -> u32 {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (c(self.r) << 16) | (c(self.g) << 8) | c(self.b)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::from_hex(0xAAAAAA)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let digits = s.strip_prefix('#').unwrap_or(&s);
        if digits.len() != 6 {
            return Err(format!("expected #RRGGBB color, got {s:?}"));
        }
        u32::from_str_radix(digits, 16)
            .map(Rgb::from_hex)
            .map_err(|_| format!("invalid hex color {s:?}"))
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.to_hex())
    }
}

/// Keplerian elements of a bound heliocentric orbit. Angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitalElements {
    /// Semi-major axis in AU.
    pub semi_major_axis: f64,
    /// Must lie in [0, 1); hyperbolic orbits are not modeled.
    #[serde(default)]
    pub eccentricity: f64,
    #[serde(default)]
    pub inclination_deg: f64,
    /// Longitude of the ascending node (Ω).
    #[serde(default)]
    pub ascending_node_deg: f64,
    /// Longitude of perihelion (ϖ = Ω + ω).
    #[serde(default)]
    pub periapsis_longitude_deg: f64,
    /// Mean longitude at simulated day zero.
    #[serde(default)]
    pub mean_longitude_deg: f64,
    pub orbital_period_years: f64,
}

impl OrbitalElements {
    /// Circular, uninclined orbit starting at periapsis.
    pub fn circular(semi_major_axis: f64, orbital_period_years: f64) -> Self {
        Self {
            semi_major_axis,
            eccentricity: 0.0,
            inclination_deg: 0.0,
            ascending_node_deg: 0.0,
            periapsis_longitude_deg: 0.0,
            mean_longitude_deg: 0.0,
            orbital_period_years,
        }
    }

    pub fn with_eccentricity(mut self, e: f64) -> Self {
        self.eccentricity = e;
        self
    }

    pub fn with_inclination(mut self, deg: f64) -> Self {
        self.inclination_deg = deg;
        self
    }

    pub fn with_ascending_node(mut self, deg: f64) -> Self {
        self.ascending_node_deg = deg;
        self
    }

    pub fn with_periapsis_longitude(mut self, deg: f64) -> Self {
        self.periapsis_longitude_deg = deg;
        self
    }

    pub fn with_mean_longitude(mut self, deg: f64) -> Self {
        self.mean_longitude_deg = deg;
        self
    }
}

/// Planetary ring, drawn as a flat annulus in the body's equatorial plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rings {
    pub inner_radius: f32,
    pub outer_radius: f32,
    #[serde(default, alias = "textureUrl")]
    pub texture: Option<String>,
}

/// Procedural particle field of a `Region` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeltSpec {
    pub inner_au: f64,
    pub outer_au: f64,
    #[serde(default = "default_particles")]
    pub particles: u32,
    /// Loose rock meshes scattered through the belt.
    #[serde(default = "default_rocks")]
    pub rocks: u32,
    /// Full vertical thickness in world units.
    #[serde(default = "default_vertical_spread")]
    pub vertical_spread: f32,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Centre of a Trojan band (AU) sharing a giant planet's orbit, if any.
    #[serde(default)]
    pub trojan_au: Option<f64>,
    /// Sparse outer belt beyond the giant planets, if any.
    #[serde(default)]
    pub outer: Option<OuterBelt>,
}

/// Outer belt of a region: thin dust between `inner_au` and `outer_au`, plus rocks
/// scattered from one AU past the inner edge to five AU past the outer edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OuterBelt {
    pub inner_au: f64,
    pub outer_au: f64,
    #[serde(default = "default_outer_rocks")]
    pub rocks: u32,
}

impl OuterBelt {
    pub fn new(inner_au: f64, outer_au: f64) -> Self {
        Self { inner_au, outer_au, rocks: default_outer_rocks() }
    }

    pub fn with_rocks(mut self, rocks: u32) -> Self {
        self.rocks = rocks;
        self
    }
}

fn default_outer_rocks() -> u32 {
    200
}

fn default_particles() -> u32 {
    200_000
}

fn default_rocks() -> u32 {
    500
}

fn default_vertical_spread() -> f32 {
    50.0
}

fn default_seed() -> u64 {
    1
}

impl BeltSpec {
    pub fn new(inner_au: f64, outer_au: f64) -> Self {
        Self {
            inner_au,
            outer_au,
            particles: default_particles(),
            rocks: default_rocks(),
            vertical_spread: default_vertical_spread(),
            seed: default_seed(),
            trojan_au: None,
            outer: None,
        }
    }

    pub fn with_trojans(mut self, center_au: f64) -> Self {
        self.trojan_au = Some(center_au);
        self
    }

    pub fn with_outer_belt(mut self, outer: OuterBelt) -> Self {
        self.outer = Some(outer);
        self
    }

    pub fn with_particles(mut self, particles: u32) -> Self {
        self.particles = particles;
        self
    }

    pub fn with_rocks(mut self, rocks: u32) -> Self {
        self.rocks = rocks;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Generated sub-entity attached to a body (meteor, comet, asteroid record).
/// Only `id` is interpreted; the rest is carried through for the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuxiliaryRecord {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl AuxiliaryRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }
}

/// One celestial object in a snapshot. Immutable input to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    pub id: BodyId,
    #[serde(default)]
    pub name: String,
    pub kind: BodyKind,
    /// Rendering size in world units, not to physical scale.
    pub radius: f32,
    #[serde(default)]
    pub color: Rgb,
    /// Required for orbiting kinds, ignored otherwise.
    #[serde(default)]
    pub orbit: Option<OrbitalElements>,
    /// Self-rotation in radians per simulated day.
    #[serde(default)]
    pub rotation_speed: f64,
    #[serde(default)]
    pub rings: Option<Rings>,
    #[serde(default)]
    pub belt: Option<BeltSpec>,
    #[serde(default, rename = "auxiliaryRecords")]
    pub auxiliary: Vec<AuxiliaryRecord>,
}

impl Body {
    pub fn new(id: impl Into<BodyId>, kind: BodyKind, radius: f32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind,
            radius,
            color: Rgb::default(),
            orbit: None,
            rotation_speed: 0.0,
            rings: None,
            belt: None,
            auxiliary: Vec::new(),
        }
    }

    // -- Builder pattern --

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn with_orbit(mut self, orbit: OrbitalElements) -> Self {
        self.orbit = Some(orbit);
        self
    }

    pub fn with_rotation_speed(mut self, rad_per_day: f64) -> Self {
        self.rotation_speed = rad_per_day;
        self
    }

    pub fn with_rings(mut self, inner_radius: f32, outer_radius: f32) -> Self {
        self.rings = Some(Rings { inner_radius, outer_radius, texture: None });
        self
    }

    pub fn with_belt(mut self, belt: BeltSpec) -> Self {
        self.belt = Some(belt);
        self
    }

    /// Label text: the name, or the id when no name was supplied.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }

    /// Orbital elements if this body actually orbits.
    pub fn orbit_elements(&self) -> Option<&OrbitalElements> {
        if self.kind.is_orbiting() {
            self.orbit.as_ref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_planet_with_rings() {
        let json = r##"{
            "id": "saturn",
            "name": "Saturn",
            "kind": "planet",
            "radius": 9,
            "color": "#F0E68C",
            "rotationSpeed": 0.75,
            "rings": { "innerRadius": 12, "outerRadius": 20, "textureUrl": "saturn_ring.png" },
            "orbit": {
                "semiMajorAxis": 9.537,
                "eccentricity": 0.054,
                "inclinationDeg": 2.485,
                "ascendingNodeDeg": 113.665,
                "periapsisLongitudeDeg": 92.599,
                "meanLongitudeDeg": 49.954,
                "orbitalPeriodYears": 29.45
            }
        }"##;
        let body: Body = serde_json::from_str(json).unwrap();
        assert_eq!(body.id, "saturn");
        assert_eq!(body.kind, BodyKind::Planet);
        assert_eq!(body.color.to_hex(), 0xF0E68C);
        let rings = body.rings.as_ref().unwrap();
        assert_eq!(rings.texture.as_deref(), Some("saturn_ring.png"));
        assert!(body.orbit_elements().is_some());
    }

    #[test]
    fn star_ignores_orbit() {
        let star = Body::new("sun", BodyKind::Star, 20.0)
            .with_orbit(OrbitalElements::circular(1.0, 1.0));
        assert!(star.orbit_elements().is_none());
        assert_eq!(star.display_name(), "sun");
    }

    #[test]
    fn bad_color_is_rejected() {
        let json = r#"{ "id": "x", "kind": "star", "radius": 1, "color": "red" }"#;
        assert!(serde_json::from_str::<Body>(json).is_err());
    }

    #[test]
    fn color_round_trips_through_display() {
        let c = Rgb::from_hex(0x4682B4);
        assert_eq!(c.to_string(), "#4682B4");
    }

    #[test]
    fn auxiliary_keeps_extra_fields() {
        let json = r#"{ "id": "m1", "speedKms": 42.0 }"#;
        let rec: AuxiliaryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.id, "m1");
        assert_eq!(rec.fields["speedKms"], 42.0);
    }
}
