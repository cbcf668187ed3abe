use std::any::Any;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::json_field;
use crate::history::command::Command;
use crate::history::HistoryError;
use crate::scene::{NodeId, Scene};

/// One component of a node's TRS transform, with its value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformComponent {
    /// Local translation.
    Translation(Vec3),
    /// Local rotation.
    Rotation(Quat),
    /// Local scale.
    Scale(Vec3),
}

impl TransformComponent {
    /// Attribute name used for coalescing granularity: dragging a
    /// translation gizmo must not merge with a rotation drag on the same
    /// node.
    #[must_use]
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::Translation(_) => "translation",
            Self::Rotation(_) => "rotation",
            Self::Scale(_) => "scale",
        }
    }

    fn read(scene: &Scene, node: NodeId, like: &Self) -> Self {
        let transform = scene
            .node(node)
            .map(|n| n.transform)
            .unwrap_or_default();
        match like {
            Self::Translation(_) => Self::Translation(transform.translation),
            Self::Rotation(_) => Self::Rotation(transform.rotation),
            Self::Scale(_) => Self::Scale(transform.scale),
        }
    }

    fn apply(&self, scene: &mut Scene, node: NodeId) {
        let Some(node) = scene.node_mut(node) else {
            return;
        };
        match *self {
            Self::Translation(v) => node.transform.translation = v,
            Self::Rotation(q) => node.transform.rotation = q,
            Self::Scale(v) => node.transform.scale = v,
        }
    }
}

/// Sets one transform component of a node. Updatable: rapid successive
/// edits to the same component of the same node coalesce into one entry.
#[derive(Debug, Clone)]
pub struct SetTransformCommand {
    node: NodeId,
    old: TransformComponent,
    new: TransformComponent,
}

impl SetTransformCommand {
    /// Registry kind string.
    pub const KIND: &'static str = "SetTransform";

    /// Move `node` to `translation`, remembering its current position.
    #[must_use]
    pub fn translate(scene: &Scene, node: NodeId, translation: Vec3) -> Self {
        let new = TransformComponent::Translation(translation);
        Self {
            node,
            old: TransformComponent::read(scene, node, &new),
            new,
        }
    }

    /// Rotate `node` to `rotation`, remembering its current orientation.
    #[must_use]
    pub fn rotate(scene: &Scene, node: NodeId, rotation: Quat) -> Self {
        let new = TransformComponent::Rotation(rotation);
        Self {
            node,
            old: TransformComponent::read(scene, node, &new),
            new,
        }
    }

    /// Scale `node` to `scale`, remembering its current scale.
    #[must_use]
    pub fn scale(scene: &Scene, node: NodeId, scale: Vec3) -> Self {
        let new = TransformComponent::Scale(scale);
        Self {
            node,
            old: TransformComponent::read(scene, node, &new),
            new,
        }
    }

    /// Blank factory for the command registry.
    #[must_use]
    pub fn blank() -> Box<dyn Command> {
        Box::new(Self {
            node: NodeId(0),
            old: TransformComponent::Translation(Vec3::ZERO),
            new: TransformComponent::Translation(Vec3::ZERO),
        })
    }

    /// The end-state component value.
    #[must_use]
    pub fn new_value(&self) -> TransformComponent {
        self.new
    }
}

impl Command for SetTransformCommand {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn display_name(&self) -> String {
        format!("Set {}", self.new.attribute())
    }

    fn target(&self) -> Option<NodeId> {
        Some(self.node)
    }

    fn attribute(&self) -> Option<&'static str> {
        Some(self.new.attribute())
    }

    fn is_updatable(&self) -> bool {
        true
    }

    fn execute(&mut self, scene: &mut Scene) {
        self.new.apply(scene, self.node);
    }

    fn undo(&mut self, scene: &mut Scene) {
        self.old.apply(scene, self.node);
    }

    fn absorb(&mut self, newer: &dyn Command) {
        if let Some(other) = newer.as_any().downcast_ref::<Self>() {
            // keep `old` so one undo reverts the whole drag
            self.new = other.new;
        }
    }

    fn to_json(&self) -> Value {
        json!({
            "type": Self::KIND,
            "node": self.node,
            "old": self.old,
            "new": self.new,
        })
    }

    fn load_json(&mut self, json: &Value) -> Result<(), HistoryError> {
        self.node = json_field(json, Self::KIND, "node")?;
        self.old = json_field(json, Self::KIND, "old")?;
        self.new = json_field(json, Self::KIND, "new")?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
