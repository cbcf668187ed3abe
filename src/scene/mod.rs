//! Minimal scene graph: flat node storage with parent links.
//!
//! Every renderable/editable object is a [`SceneNode`] stored in a flat
//! map keyed by [`NodeId`]. Hierarchy is expressed through parent links
//! only; child lists are derived on demand, so there is no second data
//! structure to keep consistent across undo/redo.

mod mesh;
mod node;

use glam::Mat4;
pub use mesh::Mesh;
pub use node::{SceneNode, Transform};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// Stable handle to a scene node. Never reused within a scene's lifetime,
/// which lets undo re-insert removed nodes under their original id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
    PartialOrd, Ord,
)]
pub struct NodeId(pub u32);

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// The authoritative scene. Owns all nodes in a flat map.
pub struct Scene {
    nodes: FxHashMap<NodeId, SceneNode>,
    next_id: u32,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: FxHashMap::default(),
            next_id: 1,
        }
    }

    /// Insert a node, assigning it a fresh id. Returns the id.
    pub fn insert(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let _ = self.nodes.insert(id, node);
        id
    }

    /// Re-insert a node under a specific id (undo of a removal). The id
    /// counter is advanced past `id` so later insertions cannot collide.
    pub fn insert_with_id(&mut self, id: NodeId, node: SceneNode) {
        self.next_id = self.next_id.max(id.0 + 1);
        let _ = self.nodes.insert(id, node);
    }

    /// Remove a node, detaching any children to the root. Returns the
    /// removed node and the ids of the children that were detached, so a
    /// removal command can restore the exact hierarchy on undo.
    pub fn remove(
        &mut self,
        id: NodeId,
    ) -> Option<(SceneNode, Vec<NodeId>)> {
        let node = self.nodes.remove(&id)?;
        let detached: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.parent == Some(id))
            .map(|(child_id, _)| *child_id)
            .collect();
        for child_id in &detached {
            if let Some(child) = self.nodes.get_mut(child_id) {
                child.parent = None;
            }
        }
        Some((node, detached))
    }

    /// Immutable access to a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Mutable access to a node.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// Iterate over all `(id, node)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Number of nodes in the scene.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene contains no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// World transform of a node: the product of its local TRS with every
    /// ancestor's. Missing nodes yield identity.
    #[must_use]
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.nodes.get(&node_id) else {
                break;
            };
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    /// Whether a node and all of its ancestors are visible. A node under a
    /// hidden ancestor does not render and must not be pickable.
    #[must_use]
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.nodes.get(&node_id) else {
                return false;
            };
            if !node.visible {
                return false;
            }
            current = node.parent;
        }
        true
    }

    /// Walk up the parent chain to the nearest ancestor flagged as a
    /// composite-model root (a server-originated model whose sub-meshes
    /// should be selected as a whole). Falls back to `id` itself when no
    /// such ancestor exists.
    #[must_use]
    pub fn composite_root_of(&self, id: NodeId) -> NodeId {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.nodes.get(&node_id) else {
                break;
            };
            if node.composite_root {
                return node_id;
            }
            current = node.parent;
        }
        id
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use glam::Vec3;

    use super::*;

    #[test]
    fn insert_assigns_fresh_ids() {
        let mut scene = Scene::new();
        let a = scene.insert(SceneNode::named("a"));
        let b = scene.insert(SceneNode::named("b"));
        assert_ne!(a, b);
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn insert_with_id_advances_counter() {
        let mut scene = Scene::new();
        scene.insert_with_id(NodeId(10), SceneNode::named("restored"));
        let fresh = scene.insert(SceneNode::named("fresh"));
        assert!(fresh.0 > 10);
    }

    #[test]
    fn remove_detaches_children() {
        let mut scene = Scene::new();
        let parent = scene.insert(SceneNode::named("parent"));
        let mut child = SceneNode::named("child");
        child.parent = Some(parent);
        let child_id = scene.insert(child);

        let (_, detached) = scene.remove(parent).unwrap();
        assert_eq!(detached, vec![child_id]);
        assert_eq!(scene.node(child_id).unwrap().parent, None);
    }

    #[test]
    fn world_matrix_composes_parent_chain() {
        let mut scene = Scene::new();
        let mut root = SceneNode::named("root");
        root.transform.translation = Vec3::new(1.0, 0.0, 0.0);
        let root_id = scene.insert(root);

        let mut child = SceneNode::named("child");
        child.parent = Some(root_id);
        child.transform.translation = Vec3::new(0.0, 2.0, 0.0);
        let child_id = scene.insert(child);

        let world = scene.world_matrix(child_id);
        let origin = world.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn hidden_ancestor_hides_descendants() {
        let mut scene = Scene::new();
        let mut root = SceneNode::named("root");
        root.visible = false;
        let root_id = scene.insert(root);

        let mut child = SceneNode::named("child");
        child.parent = Some(root_id);
        let child_id = scene.insert(child);

        assert!(!scene.is_effectively_visible(child_id));
        scene.node_mut(root_id).unwrap().visible = true;
        assert!(scene.is_effectively_visible(child_id));
    }

    #[test]
    fn composite_root_walks_ancestors() {
        let mut scene = Scene::new();
        let mut model = SceneNode::named("model");
        model.composite_root = true;
        let model_id = scene.insert(model);

        let mut group = SceneNode::named("group");
        group.parent = Some(model_id);
        let group_id = scene.insert(group);

        let mut part = SceneNode::named("part");
        part.parent = Some(group_id);
        let part_id = scene.insert(part);

        assert_eq!(scene.composite_root_of(part_id), model_id);

        let loose = scene.insert(SceneNode::named("loose"));
        assert_eq!(scene.composite_root_of(loose), loose);
    }
}
