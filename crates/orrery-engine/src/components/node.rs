use glam::Vec3;
use crate::api::types::{BodyId, NodeId};
use crate::core::resources::MeshHandle;
use crate::model::body::{Body, BodyKind};

/// What a child sub-mesh is for. Drives highlighting and pick shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRole {
    /// Planetary ring annulus.
    Ring,
    /// Belt particle field.
    Dust,
    /// Loose belt rock.
    Rock,
    /// Rock of the outer belt, beyond the giant planets.
    OuterRock,
}

/// Sub-mesh attached under a body node in the graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildNode {
    pub node: NodeId,
    pub role: ChildRole,
    pub mesh: MeshHandle,
}

/// Orbit poly-line owned by a body node and destroyed with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitPathNode {
    pub node: NodeId,
    pub mesh: MeshHandle,
    /// Opacity when neither hovered nor selected.
    pub baseline_opacity: f32,
}

/// Fat scene node: one per body, holding everything the frame loop touches.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub node: NodeId,
    /// Body as it was when this node was built. Never mutated.
    pub body: Body,
    /// World position, updated on every tick.
    pub position: Vec3,
    /// Self-rotation about +Y in radians.
    pub rotation: f32,
    /// Regions are pure groups and carry no mesh of their own.
    pub mesh: Option<MeshHandle>,
    pub children: Vec<ChildNode>,
    pub orbit_path: Option<OrbitPathNode>,
}

impl SceneNode {
    pub fn new(node: NodeId, body: Body) -> Self {
        Self {
            node,
            body,
            position: Vec3::ZERO,
            rotation: 0.0,
            mesh: None,
            children: Vec::new(),
            orbit_path: None,
        }
    }

    pub fn id(&self) -> &BodyId {
        &self.body.id
    }

    pub fn kind(&self) -> BodyKind {
        self.body.kind
    }

    /// Label anchor: top of the body.
    pub fn label_anchor(&self) -> Vec3 {
        self.position + Vec3::Y * self.body.radius
    }

    /// Every mesh this node owns, itself and orbit path included.
    pub fn meshes(&self) -> impl Iterator<Item = MeshHandle> + '_ {
        self.mesh
            .into_iter()
            .chain(self.children.iter().map(|c| c.mesh))
            .chain(self.orbit_path.iter().map(|p| p.mesh))
    }

    /// Every graph node this scene node owns.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::once(self.node)
            .chain(self.children.iter().map(|c| c.node))
            .chain(self.orbit_path.iter().map(|p| p.node))
    }
}
