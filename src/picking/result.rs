use glam::Vec3;

use crate::scene::NodeId;

/// Outcome of a single pick: which node (if any) sits under the cursor,
/// and where in world space the cursor ray landed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickResult {
    /// The picked node, or `None` when the cursor is over the background.
    pub node: Option<NodeId>,
    /// World-space position: the surface point for a hit, or the ground
    /// plane intersection for a miss.
    pub point: Vec3,
    /// View-axis distance from the camera to the surface point. Zero for
    /// a miss.
    pub distance: f32,
}

impl PickResult {
    /// A hit on `node` at `point`, `distance` along the view axis.
    #[must_use]
    pub fn hit(node: NodeId, point: Vec3, distance: f32) -> Self {
        Self {
            node: Some(node),
            point,
            distance,
        }
    }

    /// A background miss whose position falls back to `point`.
    #[must_use]
    pub fn miss(point: Vec3) -> Self {
        Self {
            node: None,
            point,
            distance: 0.0,
        }
    }

    /// Whether this pick landed on an object.
    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.node.is_some()
    }
}
