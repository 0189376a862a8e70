//! Built-in scene: the Sun, the eight planets with J2000 mean elements, a few
//! well-known small bodies and the asteroid belt with its Trojan and outer zones.

use crate::model::body::{BeltSpec, Body, BodyKind, OrbitalElements, OuterBelt, Rgb};
use crate::model::snapshot::{Snapshot, SnapshotError};

/// Id of the main-belt region body.
pub const ASTEROID_BELT_ID: &str = "asteroid_belt";

/// Main belt edges in AU: half an AU outside Mars to half an AU inside Jupiter.
pub const MAIN_BELT_INNER_AU: f64 = 1.524 + 0.5;
pub const MAIN_BELT_OUTER_AU: f64 = 5.203 - 0.5;
/// Jupiter's Trojans share its orbit.
pub const TROJAN_BAND_AU: f64 = 5.203;
/// Outer dust runs from one AU past Jupiter out to Neptune.
pub const OUTER_BELT_INNER_AU: f64 = 5.203 + 1.0;
pub const OUTER_BELT_OUTER_AU: f64 = 30.07;

const SATURN_RING_TEXTURE: &str = "saturn_ring.png";

/// (id, name, radius, color, rotation rad/day, [a, e, i, Ω, ϖ, L, P])
type PlanetRow = (&'static str, &'static str, f32, u32, f64, [f64; 7]);

const PLANETS: [PlanetRow; 8] = [
    ("mercury", "Mercury", 2.0, 0xA9A9A9, 0.1, [0.387_10, 0.205_63, 7.005, 48.331, 77.458, 252.250, 0.2408]),
    ("venus", "Venus", 4.0, 0xFFA500, 0.08, [0.723_33, 0.006_77, 3.395, 76.680, 131.602, 181.979, 0.6152]),
    ("earth", "Earth", 5.0, 0x4682B4, 0.5, [1.000_00, 0.016_71, 0.0, 0.0, 102.938, 100.465, 1.0]),
    ("mars", "Mars", 3.0, 0xFF4500, 0.45, [1.523_71, 0.093_39, 1.850, 49.713, 336.056, 355.447, 1.8808]),
    ("jupiter", "Jupiter", 10.0, 0xD2B48C, 0.8, [5.202_89, 0.048_39, 1.304, 100.474, 14.728, 34.396, 11.862]),
    ("saturn", "Saturn", 9.0, 0xF0E68C, 0.75, [9.536_68, 0.053_86, 2.486, 113.662, 92.599, 49.954, 29.457]),
    ("uranus", "Uranus", 7.0, 0xAFEEEE, 0.6, [19.189_16, 0.047_26, 0.773, 74.017, 170.954, 313.238, 84.011]),
    ("neptune", "Neptune", 7.0, 0x3F51B5, 0.55, [30.069_92, 0.008_59, 1.770, 131.784, 44.965, 304.880, 164.79]),
];

/// (id, name, kind, radius, color, [a, e, i, Ω, ϖ, L, P])
type SmallBodyRow = (&'static str, &'static str, BodyKind, f32, u32, [f64; 7]);

const SMALL_BODIES: [SmallBodyRow; 7] = [
    ("halley", "1P/Halley", BodyKind::Comet, 1.2, 0xB0C4DE, [17.834, 0.967, 162.26, 58.42, 169.75, 0.0, 75.32]),
    ("churyumov-gerasimenko", "67P/Churyumov-Gerasimenko", BodyKind::Comet, 0.8, 0x9E9E9E, [3.463, 0.641, 7.04, 50.14, 62.92, 0.0, 6.44]),
    ("tempel1", "9P/Tempel", BodyKind::Comet, 0.8, 0xA0A0A0, [3.145, 0.510, 10.47, 68.93, 248.15, 0.0, 5.58]),
    ("ceres", "Ceres", BodyKind::Asteroid, 1.0, 0x8B8B83, [2.767, 0.0785, 10.59, 80.30, 153.90, 0.0, 4.60]),
    ("vesta", "Vesta", BodyKind::Asteroid, 0.8, 0x9C9C94, [2.362, 0.0887, 7.14, 103.81, 255.01, 0.0, 3.63]),
    ("bennu", "Bennu", BodyKind::Asteroid, 0.5, 0x6E6E6E, [1.126, 0.2037, 6.035, 2.06, 68.28, 0.0, 1.20]),
    ("apophis", "Apophis", BodyKind::Asteroid, 0.5, 0x7A7A7A, [0.9224, 0.1914, 3.34, 204.45, 330.82, 0.0, 0.886]),
];

fn elements([a, e, i, node, peri, l, p]: [f64; 7]) -> OrbitalElements {
    OrbitalElements::circular(a, p)
        .with_eccentricity(e)
        .with_inclination(i)
        .with_ascending_node(node)
        .with_periapsis_longitude(peri)
        .with_mean_longitude(l)
}

/// Every body of the built-in scene, star first.
pub fn default_bodies() -> Vec<Body> {
    let mut bodies = Vec::with_capacity(1 + PLANETS.len() + SMALL_BODIES.len() + 1);

    bodies.push(
        Body::new("sun", BodyKind::Star, 20.0)
            .with_name("Sun")
            .with_color(Rgb::from_hex(0xFFFF8F))
            .with_rotation_speed(0.05),
    );

    for (id, name, radius, color, spin, el) in PLANETS {
        let mut body = Body::new(id, BodyKind::Planet, radius)
            .with_name(name)
            .with_color(Rgb::from_hex(color))
            .with_rotation_speed(spin)
            .with_orbit(elements(el));
        if id == "saturn" {
            body = body.with_rings(12.0, 20.0);
            if let Some(rings) = body.rings.as_mut() {
                rings.texture = Some(SATURN_RING_TEXTURE.to_owned());
            }
        }
        bodies.push(body);
    }

    for (id, name, kind, radius, color, el) in SMALL_BODIES {
        bodies.push(
            Body::new(id, kind, radius)
                .with_name(name)
                .with_color(Rgb::from_hex(color))
                .with_orbit(elements(el)),
        );
    }

    bodies.push(
        Body::new(ASTEROID_BELT_ID, BodyKind::Region, 1.0)
            .with_name("Asteroid Belt")
            .with_color(Rgb::from_hex(0x007BA7))
            .with_rotation_speed(0.001)
            .with_belt(
                BeltSpec::new(MAIN_BELT_INNER_AU, MAIN_BELT_OUTER_AU)
                    .with_trojans(TROJAN_BAND_AU)
                    .with_outer_belt(OuterBelt::new(OUTER_BELT_INNER_AU, OUTER_BELT_OUTER_AU)),
            ),
    );

    bodies
}

/// The built-in scene as a validated snapshot.
pub fn default_snapshot() -> Result<Snapshot, SnapshotError> {
    Snapshot::new(default_bodies())
}
