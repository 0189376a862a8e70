use glam::{Quat, Vec3};
use crate::api::types::{BodyId, NodeId};
use crate::components::mesh::Geometry;
use crate::core::graph::{NodeGraph, WorldTransform};
use crate::core::resources::{MeshHandle, Resources};

/// Half-line in world space. `direction` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray, normalizing the direction. Returns `None` for a zero direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Nearest non-negative hit distance against a sphere.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        let near = -b - sq;
        let far = -b + sq;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            // Origin inside the sphere.
            Some(0.0)
        } else {
            None
        }
    }

    /// Hit distance against a flat annulus with a +Y normal (double sided).
    pub fn intersect_annulus(&self, center: Vec3, inner: f32, outer: f32) -> Option<f32> {
        if self.direction.y.abs() < 1e-6 {
            return None;
        }
        let t = (center.y - self.origin.y) / self.direction.y;
        if t < 0.0 {
            return None;
        }
        let d = (self.at(t) - center).length();
        (inner..=outer).contains(&d).then_some(t)
    }

    /// Distance along the ray to the closest approach to `point`, and the miss distance there.
    /// `None` when the point is behind the origin.
    pub fn closest_approach(&self, point: Vec3) -> Option<(f32, f32)> {
        let t = (point - self.origin).dot(self.direction);
        if t < 0.0 {
            return None;
        }
        Some((t, (self.at(t) - point).length()))
    }
}

/// Hit-test primitive for one pickable node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickShape {
    /// Solid mesh, tested by its bounding sphere.
    Sphere { radius: f32 },
    /// Ring in the node's XZ plane.
    Annulus { inner: f32, outer: f32 },
    /// Particle field; positions are read from the node's geometry.
    Points { mesh: MeshHandle },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickEntry {
    pub node: NodeId,
    pub shape: PickShape,
}

/// Flat list of hit-testable nodes, rebuilt with the registry.
#[derive(Debug, Clone)]
pub struct PickIndex {
    entries: Vec<PickEntry>,
    /// Ray-to-point distance that counts as a particle hit (world units).
    point_threshold: f32,
}

impl PickIndex {
    pub fn new(point_threshold: f32) -> Self {
        Self {
            entries: Vec::new(),
            point_threshold,
        }
    }

    pub fn insert(&mut self, node: NodeId, shape: PickShape) {
        self.entries.push(PickEntry { node, shape });
    }

    /// Drop every entry belonging to one of `nodes`.
    pub fn remove_nodes(&mut self, nodes: &[NodeId]) {
        self.entries.retain(|e| !nodes.contains(&e.node));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PickEntry] {
        &self.entries
    }

    pub fn point_threshold(&self) -> f32 {
        self.point_threshold
    }

    /// Nearest hit node along the ray, with its distance.
    pub fn nearest(&self, ray: &Ray, graph: &NodeGraph, resources: &Resources) -> Option<(NodeId, f32)> {
        let mut best: Option<(NodeId, f32)> = None;
        for entry in &self.entries {
            let Some(world) = graph.world(entry.node) else { continue };
            let Some(t) = self.hit(entry, &world, ray, resources) else { continue };
            if best.map_or(true, |(_, bt)| t < bt) {
                best = Some((entry.node, t));
            }
        }
        best
    }

    /// Resolve the nearest hit to its owning body. A miss gives `None`.
    pub fn query(&self, ray: &Ray, graph: &NodeGraph, resources: &Resources) -> Option<BodyId> {
        let (node, _) = self.nearest(ray, graph, resources)?;
        graph.owner_of(node).cloned()
    }

    fn hit(&self, entry: &PickEntry, world: &WorldTransform, ray: &Ray, resources: &Resources) -> Option<f32> {
        match entry.shape {
            PickShape::Sphere { radius } => ray.intersect_sphere(world.position, radius * world.scale),
            PickShape::Annulus { inner, outer } => {
                ray.intersect_annulus(world.position, inner * world.scale, outer * world.scale)
            }
            PickShape::Points { mesh } => {
                let Some(Geometry::PointCloud { positions }) = resources.geometry(mesh) else {
                    return None;
                };
                let rotation = Quat::from_rotation_y(world.yaw);
                positions
                    .iter()
                    .filter_map(|p| ray.closest_approach(world.position + rotation * *p * world.scale))
                    .filter(|&(_, miss)| miss < self.point_threshold)
                    .map(|(t, _)| t)
                    .min_by(|a, b| a.total_cmp(b))
            }
        }
    }
}
