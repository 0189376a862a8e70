use std::collections::{BTreeMap, HashSet};
use std::f64::consts::TAU;
use glam::Vec3;

use crate::api::config::OrreryConfig;
use crate::api::types::{BodyId, NodeId};
use crate::components::mesh::Geometry;
use crate::components::node::{ChildNode, ChildRole, OrbitPathNode, SceneNode};
use crate::core::graph::{LocalTransform, NodeGraph};
use crate::core::resources::Resources;
use crate::model::body::{Body, BodyKind};
use crate::orbit::{position_at, sample_orbit_path, PathExtent};
use crate::model::snapshot::MAX_BELT_PARTICLES;
use crate::systems::belt::{scatter_dust, scatter_outer_rocks, scatter_rocks};
use crate::systems::highlight;
use crate::systems::pick::{PickIndex, PickShape, Ray};

/// Counts from one incremental [`SceneObjectRegistry::sync`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub added: usize,
    pub removed: usize,
    pub rebuilt: usize,
    pub kept: usize,
}

/// Owns every scene node, its render resources and the pick index.
///
/// Keyed by `BodyId` in a `BTreeMap` so iteration order (and therefore render and label
/// order) is stable across frames. Nodes keep a clone of the body they were built from;
/// the registry never mutates body data.
pub struct SceneObjectRegistry {
    nodes: BTreeMap<BodyId, SceneNode>,
    graph: NodeGraph,
    resources: Resources,
    picks: PickIndex,
    au_scale: f64,
    orbit_samples: usize,
    belt_particles: Option<u32>,
    /// Simulated day of the last tick; new nodes are placed here.
    last_days: f64,
}

impl SceneObjectRegistry {
    pub fn new(config: &OrreryConfig) -> Self {
        Self {
            nodes: BTreeMap::new(),
            graph: NodeGraph::new(),
            resources: Resources::new(),
            picks: PickIndex::new(config.point_pick_threshold),
            au_scale: config.au_scale,
            orbit_samples: config.orbit_samples,
            belt_particles: config.belt_particles,
            last_days: 0.0,
        }
    }

    /// Tear everything down and build one node per body.
    /// Every previously owned resource is disposed before anything new is allocated.
    pub fn rebuild(&mut self, bodies: &[Body]) {
        self.clear();
        for body in bodies {
            let node = self.build_node(body);
            self.insert_node(node);
        }
        self.tick(self.last_days);
        log::info!(
            "Scene rebuilt: {} bodies, {} nodes, {} live resources",
            self.nodes.len(),
            self.graph.len(),
            self.resources.live_count()
        );
    }

    /// Bring the scene in line with `bodies` touching only what changed.
    /// Unchanged nodes keep their handles and transforms.
    pub fn sync(&mut self, bodies: &[Body]) -> SyncStats {
        let mut stats = SyncStats::default();
        let incoming: HashSet<&BodyId> = bodies.iter().map(|b| &b.id).collect();

        let stale: Vec<BodyId> = self
            .nodes
            .keys()
            .filter(|id| !incoming.contains(id))
            .cloned()
            .collect();
        for id in stale {
            self.remove(&id);
            stats.removed += 1;
        }

        for body in bodies {
            match self.nodes.get(&body.id).map(|n| n.body == *body) {
                Some(true) => {
                    stats.kept += 1;
                    continue;
                }
                Some(false) => {
                    self.remove(&body.id);
                    stats.rebuilt += 1;
                }
                None => stats.added += 1,
            }
            let node = self.build_node(body);
            self.insert_node(node);
        }

        // Deterministic, so kept nodes land exactly where they were.
        self.tick(self.last_days);
        log::debug!(
            "Scene sync: +{} -{} ~{} ={}",
            stats.added,
            stats.removed,
            stats.rebuilt,
            stats.kept
        );
        stats
    }

    /// Move every body to its position at `days` and apply self-rotation.
    pub fn tick(&mut self, days: f64) {
        self.last_days = days;
        for node in self.nodes.values_mut() {
            if let Some(elements) = node.body.orbit_elements() {
                node.position = (position_at(elements, days) * self.au_scale).as_vec3();
            }
            node.rotation = (node.body.rotation_speed * days).rem_euclid(TAU) as f32;
            self.graph.set_local(
                node.node,
                LocalTransform::at(node.position).with_yaw(node.rotation),
            );
        }
        self.graph.propagate();
    }

    /// Remove one body and dispose everything it owns.
    pub fn remove(&mut self, id: &BodyId) -> bool {
        let Some(node) = self.nodes.remove(id) else { return false };
        self.dispose_node(&node);
        true
    }

    /// Dispose every node. The registry is empty afterwards.
    pub fn clear(&mut self) {
        let nodes = std::mem::take(&mut self.nodes);
        for node in nodes.values() {
            self.dispose_node(node);
        }
        self.graph.clear();
        self.picks.clear();
    }

    /// Body hit by `ray`, if any.
    pub fn pick(&self, ray: &Ray) -> Option<BodyId> {
        self.picks.query(ray, &self.graph, &self.resources)
    }

    pub fn get(&self, id: &str) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn picks(&self) -> &PickIndex {
        &self.picks
    }

    pub fn au_scale(&self) -> f64 {
        self.au_scale
    }

    pub fn last_days(&self) -> f64 {
        self.last_days
    }

    /// Nodes for reading and resources for writing, borrowed together.
    pub fn split_mut(&mut self) -> (&BTreeMap<BodyId, SceneNode>, &mut Resources) {
        (&self.nodes, &mut self.resources)
    }

    /// Meshes currently referenced by nodes. Each one holds two live pool handles.
    pub fn owned_mesh_count(&self) -> usize {
        self.nodes.values().map(|n| n.meshes().count()).sum()
    }

    /// Store a freshly built node. A node already stored under the same id is
    /// disposed, so a list with repeated ids never strands resources.
    fn insert_node(&mut self, node: SceneNode) {
        if let Some(old) = self.nodes.insert(node.id().clone(), node) {
            log::warn!("Body id {} given twice; keeping the last one", old.id());
            self.dispose_node(&old);
        }
    }

    fn dispose_node(&mut self, node: &SceneNode) {
        for mesh in node.meshes() {
            let disposed = self.resources.dispose_mesh(mesh);
            debug_assert!(disposed, "mesh of {} disposed twice", node.id());
        }
        let mut removed = self.graph.remove_subtree(node.node);
        if let Some(path) = &node.orbit_path {
            removed.extend(self.graph.remove_subtree(path.node));
        }
        self.picks.remove_nodes(&removed);
    }

    fn spawn_child(&mut self, parent: NodeId, offset: Vec3) -> NodeId {
        let child = self.graph.spawn(LocalTransform::at(offset));
        self.graph.set_parent(child, Some(parent));
        child
    }

    fn build_node(&mut self, body: &Body) -> SceneNode {
        let root = self.graph.spawn(LocalTransform::default());
        self.graph.tag(root, body.id.clone());
        let mut node = SceneNode::new(root, body.clone());

        let geometry = match body.kind {
            BodyKind::Star | BodyKind::Planet => Some(Geometry::sphere(body.radius)),
            BodyKind::Comet | BodyKind::Asteroid => Some(Geometry::icosahedron(body.radius)),
            BodyKind::Region => None,
        };
        if let Some(geometry) = geometry {
            let mesh = self
                .resources
                .create_mesh(geometry, highlight::body_material(body, false));
            node.mesh = Some(mesh);
            self.picks.insert(root, PickShape::Sphere { radius: body.radius });
        }

        if let Some(rings) = body.rings.as_ref().filter(|_| body.kind != BodyKind::Region) {
            let child = self.spawn_child(root, Vec3::ZERO);
            let mesh = self.resources.create_mesh(
                Geometry::ring(rings.inner_radius, rings.outer_radius),
                highlight::ring_material(rings),
            );
            self.picks.insert(
                child,
                PickShape::Annulus { inner: rings.inner_radius, outer: rings.outer_radius },
            );
            node.children.push(ChildNode { node: child, role: ChildRole::Ring, mesh });
        }

        if let Some(belt) = body.belt.as_ref().filter(|_| body.kind == BodyKind::Region) {
            let count = self.belt_particles.unwrap_or(belt.particles).min(MAX_BELT_PARTICLES);
            let dust = self.spawn_child(root, Vec3::ZERO);
            let mesh = self.resources.create_mesh(
                Geometry::PointCloud { positions: scatter_dust(belt, self.au_scale, count) },
                highlight::dust_material(false),
            );
            self.picks.insert(dust, PickShape::Points { mesh });
            node.children.push(ChildNode { node: dust, role: ChildRole::Dust, mesh });

            for rock in scatter_rocks(belt, self.au_scale) {
                let child = self.spawn_child(root, rock.position);
                let mesh = self.resources.create_mesh(
                    Geometry::icosahedron(rock.radius),
                    highlight::rock_material(false),
                );
                self.picks.insert(child, PickShape::Sphere { radius: rock.radius });
                node.children.push(ChildNode { node: child, role: ChildRole::Rock, mesh });
            }

            for rock in scatter_outer_rocks(belt, self.au_scale) {
                let child = self.spawn_child(root, rock.position);
                let mesh = self.resources.create_mesh(
                    Geometry::icosahedron(rock.radius),
                    highlight::outer_rock_material(false),
                );
                self.picks.insert(child, PickShape::Sphere { radius: rock.radius });
                node.children.push(ChildNode { node: child, role: ChildRole::OuterRock, mesh });
            }
        }

        if let Some(elements) = body.orbit_elements() {
            let extent = if body.kind == BodyKind::Comet { PathExtent::Half } else { PathExtent::Full };
            let points = sample_orbit_path(elements, self.orbit_samples, extent, self.au_scale);
            // Orbit lines live at the scene root and are not pickable.
            let path_node = self.graph.spawn(LocalTransform::default());
            let mesh = self.resources.create_mesh(
                Geometry::Polyline { points },
                highlight::path_material(body, false),
            );
            node.orbit_path = Some(OrbitPathNode {
                node: path_node,
                mesh,
                baseline_opacity: highlight::path_opacity(body.kind, false),
            });
        }

        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::body::{BeltSpec, OrbitalElements, OuterBelt, Rgb};

    fn config() -> OrreryConfig {
        OrreryConfig::default()
    }

    fn planets() -> Vec<Body> {
        vec![
            Body::new("sun", BodyKind::Star, 20.0),
            Body::new("earth", BodyKind::Planet, 5.0)
                .with_color(Rgb::from_hex(0x4682B4))
                .with_rotation_speed(1.0)
                .with_orbit(OrbitalElements::circular(1.0, 1.0).with_eccentricity(0.017)),
            Body::new("saturn", BodyKind::Planet, 9.0)
                .with_rings(12.0, 20.0)
                .with_orbit(OrbitalElements::circular(9.537, 29.45).with_eccentricity(0.054)),
        ]
    }

    fn halley() -> Body {
        Body::new("halley", BodyKind::Comet, 1.0).with_orbit(
            OrbitalElements::circular(17.8, 75.3)
                .with_eccentricity(0.967)
                .with_inclination(162.3),
        )
    }

    fn belt() -> Body {
        Body::new("asteroid_belt", BodyKind::Region, 1.0)
            .with_belt(BeltSpec::new(2.024, 4.703).with_particles(200).with_rocks(10))
    }

    #[test]
    fn rebuild_creates_one_node_per_body() {
        let mut registry = SceneObjectRegistry::new(&config());
        registry.rebuild(&planets());
        assert_eq!(registry.len(), 3);
        assert!(registry.get("saturn").unwrap().orbit_path.is_some());
        assert!(registry.get("sun").unwrap().orbit_path.is_none());
        assert_eq!(registry.get("saturn").unwrap().children.len(), 1);
        // sun + earth + saturn + saturn ring
        assert_eq!(registry.picks().len(), 4);
    }

    #[test]
    fn repeated_rebuilds_do_not_leak() {
        let mut registry = SceneObjectRegistry::new(&config());
        let mut with_extras = planets();
        with_extras.push(halley());
        with_extras.push(belt());

        for i in 0..10 {
            if i % 2 == 0 {
                registry.rebuild(&with_extras);
            } else {
                registry.rebuild(&planets());
            }
        }
        registry.rebuild(&planets());

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.resources().live_count(), 2 * registry.owned_mesh_count());
        // sun, earth, earth path, saturn, ring, saturn path
        assert_eq!(registry.owned_mesh_count(), 6);
        assert_eq!(registry.graph().len(), 6);
        assert_eq!(registry.picks().len(), 4);
    }

    #[test]
    fn rebuild_with_empty_list_frees_everything() {
        let mut registry = SceneObjectRegistry::new(&config());
        registry.rebuild(&planets());
        registry.rebuild(&[]);
        assert!(registry.is_empty());
        assert_eq!(registry.resources().live_count(), 0);
        assert!(registry.graph().is_empty());
        assert!(registry.picks().is_empty());
    }

    #[test]
    fn adding_a_comet_leaves_others_in_place() {
        let mut registry = SceneObjectRegistry::new(&config());
        registry.rebuild(&planets());
        registry.tick(123.0);
        let before: Vec<(BodyId, Vec3)> =
            registry.iter().map(|n| (n.id().clone(), n.position)).collect();
        let picks_before = registry.picks().len();

        let mut next = planets();
        next.push(halley());
        let stats = registry.sync(&next);

        assert_eq!(stats, SyncStats { added: 1, removed: 0, rebuilt: 0, kept: 3 });
        assert_eq!(registry.len(), before.len() + 1);
        assert_eq!(registry.picks().len(), picks_before + 1);
        for (id, position) in before {
            assert_eq!(registry.get(id.as_str()).unwrap().position, position, "{id} moved");
        }
    }

    #[test]
    fn sync_rebuilds_changed_and_drops_missing() {
        let mut registry = SceneObjectRegistry::new(&config());
        registry.rebuild(&planets());
        let earth_node = registry.get("earth").unwrap().node;

        let mut next = planets();
        next.remove(2); // saturn
        next[1] = next[1].clone().with_color(Rgb::from_hex(0x00FF00));
        let stats = registry.sync(&next);

        assert_eq!(stats, SyncStats { added: 0, removed: 1, rebuilt: 1, kept: 1 });
        assert!(registry.get("saturn").is_none());
        assert_ne!(registry.get("earth").unwrap().node, earth_node);
        assert_eq!(registry.resources().live_count(), 2 * registry.owned_mesh_count());
    }

    #[test]
    fn tick_moves_orbiting_bodies_only() {
        let mut registry = SceneObjectRegistry::new(&config());
        registry.rebuild(&planets());
        registry.tick(0.0);
        let earth0 = registry.get("earth").unwrap().position;
        registry.tick(182.625);
        let earth1 = registry.get("earth").unwrap().position;

        assert_eq!(registry.get("sun").unwrap().position, Vec3::ZERO);
        assert!((earth0.length() - 15.0).abs() < 0.5, "earth at {earth0}");
        assert!(earth0.distance(earth1) > 25.0, "half a year should cross the orbit");
        assert!(registry.get("earth").unwrap().rotation > 0.0);
    }

    #[test]
    fn comet_path_is_half_length() {
        let mut registry = SceneObjectRegistry::new(&config());
        registry.rebuild(&[halley()]);
        let node = registry.get("halley").unwrap();
        let path = node.orbit_path.unwrap();
        match registry.resources().geometries.get(path.mesh.geometry) {
            Some(Geometry::Polyline { points }) => assert_eq!(points.len(), 101),
            other => panic!("expected polyline, got {other:?}"),
        }
        assert_eq!(path.baseline_opacity, highlight::SMALL_BODY_PATH_OPACITY);
    }

    #[test]
    fn belt_particle_override_applies() {
        let mut cfg = config();
        cfg.belt_particles = Some(50);
        let mut registry = SceneObjectRegistry::new(&cfg);
        registry.rebuild(&[belt()]);
        let node = registry.get("asteroid_belt").unwrap();
        assert!(node.mesh.is_none());
        let dust = node.children.iter().find(|c| c.role == ChildRole::Dust).unwrap();
        assert_eq!(registry.resources().geometry(dust.mesh).unwrap().vertex_count(), 50);
        assert_eq!(node.children.iter().filter(|c| c.role == ChildRole::Rock).count(), 10);
    }

    #[test]
    fn repeated_id_keeps_last_and_frees_first() {
        let mut registry = SceneObjectRegistry::new(&config());
        let mut bodies = planets();
        bodies.push(
            Body::new("earth", BodyKind::Planet, 6.0)
                .with_orbit(OrbitalElements::circular(1.0, 1.0)),
        );
        registry.rebuild(&bodies);

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("earth").unwrap().body.radius, 6.0);
        assert_eq!(registry.resources().live_count(), 2 * registry.owned_mesh_count());
        assert_eq!(registry.graph().len(), 6);
        assert_eq!(registry.picks().len(), 4);
    }

    #[test]
    fn outer_belt_adds_its_own_rocks() {
        let mut registry = SceneObjectRegistry::new(&config());
        let belt = Body::new("asteroid_belt", BodyKind::Region, 1.0).with_belt(
            BeltSpec::new(2.024, 4.703)
                .with_particles(100)
                .with_rocks(4)
                .with_trojans(5.203)
                .with_outer_belt(OuterBelt::new(6.203, 30.07).with_rocks(7)),
        );
        registry.rebuild(&[belt]);

        let node = registry.get("asteroid_belt").unwrap();
        let count = |role| node.children.iter().filter(|c| c.role == role).count();
        assert_eq!(count(ChildRole::Rock), 4);
        assert_eq!(count(ChildRole::OuterRock), 7);
        // dust + 4 + 7 rocks
        assert_eq!(registry.picks().len(), 12);
    }

    #[test]
    fn pick_through_registry_resolves_ring_to_planet() {
        let mut registry = SceneObjectRegistry::new(&config());
        registry.rebuild(&planets());
        registry.tick(0.0);
        let saturn = registry.get("saturn").unwrap().position;

        let target = saturn + Vec3::new(16.0, 0.0, 0.0);
        let ray = Ray::new(target + Vec3::Y * 50.0, Vec3::NEG_Y).unwrap();
        assert_eq!(registry.pick(&ray).unwrap(), "saturn");
    }
}
