// core/graph.rs
//
// Scene-node hierarchy: parent links, local offsets and body-id ownership tags.
//
// Usage:
//   let mut graph = NodeGraph::new();
//   let planet = graph.spawn(LocalTransform::at(pos));
//   graph.tag(planet, BodyId::new("saturn"));
//   let ring = graph.spawn(LocalTransform::default());
//   graph.set_parent(ring, Some(planet));
//   graph.propagate();                 // world transforms from local offsets
//   graph.owner_of(ring);              // Some("saturn")

use std::collections::HashMap;
use glam::{Quat, Vec3};
use crate::api::types::{BodyId, NodeId};

/// Transform of a node relative to its parent (or the world if it has none).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    /// Position relative to the parent.
    pub offset: Vec3,
    /// Spin about the parent's +Y axis, radians.
    pub yaw: f32,
    /// Uniform scale multiplier relative to the parent.
    pub scale: f32,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            offset: Vec3::ZERO,
            yaw: 0.0,
            scale: 1.0,
        }
    }
}

impl LocalTransform {
    pub fn at(offset: Vec3) -> Self {
        Self { offset, ..Self::default() }
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }
}

/// Resolved world-space transform, written by [`NodeGraph::propagate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTransform {
    pub position: Vec3,
    pub yaw: f32,
    pub scale: f32,
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct GraphNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    owner: Option<BodyId>,
    local: LocalTransform,
    world: WorldTransform,
}

/// Node hierarchy with explicit ownership tags.
///
/// Every drawable piece of the scene (body mesh, ring, belt rock, orbit line) is a node.
/// Top-level body nodes carry the `BodyId` they render; sub-meshes carry nothing and
/// resolve to their body through the parent chain.
#[derive(Debug, Default)]
pub struct NodeGraph {
    nodes: HashMap<NodeId, GraphNode>,
    /// Nodes with no parent (top-level).
    roots: Vec<NodeId>,
    next_id: u32,
    /// Set when locals or links change, cleared after propagate.
    dirty: bool,
}

impl NodeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a root node with the given local transform.
    pub fn spawn(&mut self, local: LocalTransform) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(
            id,
            GraphNode {
                local,
                world: WorldTransform {
                    position: local.offset,
                    yaw: local.yaw,
                    scale: local.scale,
                },
                ..GraphNode::default()
            },
        );
        self.roots.push(id);
        self.dirty = true;
        id
    }

    /// Mark a node as the one that renders `body`.
    pub fn tag(&mut self, id: NodeId, body: BodyId) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.owner = Some(body);
        }
    }

    /// The tag directly on this node, without walking up.
    pub fn tag_of(&self, id: NodeId) -> Option<&BodyId> {
        self.nodes.get(&id).and_then(|n| n.owner.as_ref())
    }

    /// Walk up the parent chain until a node carrying a body tag is found.
    pub fn owner_of(&self, id: NodeId) -> Option<&BodyId> {
        let mut current = Some(id);
        // Bounded by node count so a malformed chain can't spin forever.
        for _ in 0..=self.nodes.len() {
            let node = self.nodes.get(&current?)?;
            if let Some(owner) = &node.owner {
                return Some(owner);
            }
            current = node.parent;
        }
        None
    }

    /// Set the parent of a node. Pass `None` to make it a root.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) {
        if !self.nodes.contains_key(&child) {
            return;
        }
        if let Some(p) = parent {
            if p == child || !self.nodes.contains_key(&p) {
                return;
            }
        }

        if let Some(old_parent) = self.nodes.get(&child).and_then(|n| n.parent) {
            if let Some(old_node) = self.nodes.get_mut(&old_parent) {
                old_node.children.retain(|&c| c != child);
            }
        }

        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = parent;
        }

        match parent {
            Some(p) => {
                if let Some(parent_node) = self.nodes.get_mut(&p) {
                    if !parent_node.children.contains(&child) {
                        parent_node.children.push(child);
                    }
                }
                self.roots.retain(|&r| r != child);
            }
            None => {
                if !self.roots.contains(&child) {
                    self.roots.push(child);
                }
            }
        }

        self.dirty = true;
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn local(&self, id: NodeId) -> Option<&LocalTransform> {
        self.nodes.get(&id).map(|n| &n.local)
    }

    pub fn set_local(&mut self, id: NodeId, local: LocalTransform) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local = local;
            self.dirty = true;
        }
    }

    /// World transform as of the last [`propagate`](Self::propagate).
    pub fn world(&self, id: NodeId) -> Option<WorldTransform> {
        self.nodes.get(&id).map(|n| n.world)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Remove a node and every node below it. Returns the removed ids, root first.
    pub fn remove_subtree(&mut self, id: NodeId) -> Vec<NodeId> {
        let mut removed = Vec::new();
        let Some(node) = self.nodes.get(&id) else { return removed };

        if let Some(parent) = node.parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|&c| c != id);
            }
        }
        self.roots.retain(|&r| r != id);

        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend(node.children);
                removed.push(next);
            }
        }
        self.dirty = true;
        removed
    }

    /// Recompute world transforms from roots down. No-op when nothing changed.
    pub fn propagate(&mut self) {
        if !self.dirty {
            return;
        }

        let mut stack: Vec<(NodeId, WorldTransform)> = self
            .roots
            .iter()
            .map(|&r| (r, WorldTransform::default()))
            .collect();

        while let Some((id, parent)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(&id) else { continue };
            let local = node.local;
            let rotated = Quat::from_rotation_y(parent.yaw) * local.offset;
            let world = WorldTransform {
                position: parent.position + rotated * parent.scale,
                yaw: parent.yaw + local.yaw,
                scale: parent.scale * local.scale,
            };
            node.world = world;
            stack.extend(node.children.iter().map(|&c| (c, world)));
        }

        self.dirty = false;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node. Ids keep counting up so stale ids never alias new nodes.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
        self.dirty = false;
    }
}
