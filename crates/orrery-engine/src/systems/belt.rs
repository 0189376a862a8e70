use std::f32::consts::TAU;
use glam::Vec3;
use crate::core::rng::Rng;
use crate::model::body::BeltSpec;

/// Share of dust particles scattered inside the belt's inner edge.
const INTERIOR_SHARE: f32 = 0.05;
/// Share of dust in the Trojan band when the belt has one.
const TROJAN_SHARE: f32 = 0.295;
/// Share of dust in the outer belt when the belt has one.
const OUTER_SHARE: f32 = 0.005;
/// Half-width of the Trojan band in AU.
const TROJAN_HALF_WIDTH_AU: f64 = 0.5;

/// One loose rock of a belt: local position and icosahedron radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rock {
    pub position: Vec3,
    pub radius: f32,
}

/// Where a dust particle was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DustZone {
    Interior,
    Main,
    Trojan,
    Outer,
}

/// Cumulative zone cut-offs. Shares of absent zones fall to the main belt.
struct ZoneCuts {
    main_end: f32,
    trojan_end: f32,
}

impl ZoneCuts {
    fn new(spec: &BeltSpec) -> Self {
        let trojan = if spec.trojan_au.is_some() { TROJAN_SHARE } else { 0.0 };
        let outer = if spec.outer.is_some() { OUTER_SHARE } else { 0.0 };
        let main_end = 1.0 - trojan - outer;
        Self { main_end, trojan_end: main_end + trojan }
    }

    fn zone(&self, roll: f32) -> DustZone {
        if roll < INTERIOR_SHARE {
            DustZone::Interior
        } else if roll < self.main_end {
            DustZone::Main
        } else if roll < self.trojan_end {
            DustZone::Trojan
        } else {
            DustZone::Outer
        }
    }
}

/// Scatter `count` dust particles for a belt, in world units around the origin.
///
/// Particles fall into zones: a thin interior haze, the main belt (biased toward its
/// inner edge and flattened toward the ecliptic), an optional Trojan band and an
/// optional sparse outer belt.
pub fn scatter_dust(spec: &BeltSpec, au_scale: f64, count: u32) -> Vec<Vec3> {
    scatter_dust_zoned(spec, au_scale, count)
        .into_iter()
        .map(|(_, p)| p)
        .collect()
}

/// [`scatter_dust`] with the zone of every particle.
pub fn scatter_dust_zoned(spec: &BeltSpec, au_scale: f64, count: u32) -> Vec<(DustZone, Vec3)> {
    let mut rng = Rng::new(spec.seed);
    let world = |au: f64| (au * au_scale) as f32;
    let inner = world(spec.inner_au);
    let outer = world(spec.outer_au);
    let spread = spec.vertical_spread;
    let cuts = ZoneCuts::new(spec);

    (0..count)
        .map(|_| {
            let zone = cuts.zone(rng.next_f32());
            let (dist, y) = match (zone, spec.trojan_au, spec.outer.as_ref()) {
                (DustZone::Trojan, Some(center), _) => {
                    let dist = rng.range(
                        world(center - TROJAN_HALF_WIDTH_AU),
                        world(center + TROJAN_HALF_WIDTH_AU),
                    );
                    (dist, rng.spread(1.0) * rng.next_f32() * spread * 1.5)
                }
                (DustZone::Outer, _, Some(belt)) => {
                    let dist = rng.range(world(belt.inner_au), world(belt.outer_au));
                    (dist, rng.spread(1.0) * rng.next_f32() * spread * 1.2)
                }
                (DustZone::Interior, _, _) => {
                    let dist = rng.range(0.0, inner);
                    (dist, rng.spread(1.0) * rng.next_f32() * spread * 0.1)
                }
                _ => {
                    let bias = rng.next_f32().sqrt();
                    let dist = inner + bias * (outer - inner);
                    let flatten = rng.next_f32();
                    (dist, rng.spread(1.0) * flatten * flatten * spread)
                }
            };
            let angle = rng.range(0.0, TAU);
            (zone, Vec3::new(angle.cos() * dist, y, angle.sin() * dist))
        })
        .collect()
}

fn ring_of_rocks(
    rng: &mut Rng,
    count: u32,
    (inner, outer): (f32, f32),
    (min_size, max_size): (f32, f32),
    vertical: f32,
) -> Vec<Rock> {
    (0..count)
        .map(|_| {
            let radius = rng.range(min_size, max_size);
            let dist = rng.range(inner, outer);
            let angle = rng.range(0.0, TAU);
            let y = rng.spread(vertical);
            Rock {
                position: Vec3::new(angle.cos() * dist, y, angle.sin() * dist),
                radius,
            }
        })
        .collect()
}

/// Scatter the loose rocks of the main belt. Uses a stream independent of the dust so
/// changing the particle count never moves the rocks.
pub fn scatter_rocks(spec: &BeltSpec, au_scale: f64) -> Vec<Rock> {
    let mut rng = Rng::new(spec.seed.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    let edges = ((spec.inner_au * au_scale) as f32, (spec.outer_au * au_scale) as f32);
    ring_of_rocks(&mut rng, spec.rocks, edges, (0.1, 0.4), spec.vertical_spread * 1.2)
}

/// Scatter the outer-belt rocks, if the belt has an outer belt.
pub fn scatter_outer_rocks(spec: &BeltSpec, au_scale: f64) -> Vec<Rock> {
    let Some(belt) = spec.outer.as_ref() else { return Vec::new() };
    let mut rng = Rng::new(spec.seed.wrapping_mul(0xC2B2_AE3D_27D4_EB4F));
    let edges = (
        ((belt.inner_au + 1.0) * au_scale) as f32,
        ((belt.outer_au + 5.0) * au_scale) as f32,
    );
    ring_of_rocks(&mut rng, belt.rocks, edges, (0.2, 0.5), spec.vertical_spread * 1.6)
}
