use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::mesh::Mesh;
use super::NodeId;

/// Local TRS transform of a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Local translation.
    pub translation: Vec3,
    /// Local rotation.
    pub rotation: Quat,
    /// Local non-uniform scale.
    pub scale: Vec3,
}

impl Transform {
    /// Local transform matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            self.rotation,
            self.translation,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// A scene node: transform, hierarchy link, visibility, and optional mesh.
///
/// Serialization covers the CPU-side state only; GPU buffers are re-uploaded
/// after a node round-trips through a command's persisted form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneNode {
    /// Human-readable name.
    pub name: String,
    /// Parent node, or `None` for a root-level node.
    pub parent: Option<NodeId>,
    /// Local transform.
    pub transform: Transform,
    /// Whether this node renders (descendants inherit invisibility).
    pub visible: bool,
    /// Marks the root of a server-originated composite model; whole-object
    /// selection resolves sub-mesh hits to this ancestor.
    pub composite_root: bool,
    /// Attached script source, if any.
    pub script: Option<String>,
    /// Attached mesh geometry, if any.
    pub mesh: Option<Mesh>,
}

impl SceneNode {
    /// A visible, meshless node with the given name.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            visible: true,
            ..Self::default()
        }
    }

    /// A visible node with the given name and mesh.
    #[must_use]
    pub fn with_mesh(name: &str, mesh: Mesh) -> Self {
        Self {
            name: name.to_owned(),
            visible: true,
            mesh: Some(mesh),
            ..Self::default()
        }
    }
}
