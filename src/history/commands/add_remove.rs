use std::any::Any;

use serde_json::{json, Value};

use super::json_field;
use crate::history::command::Command;
use crate::history::HistoryError;
use crate::scene::{NodeId, Scene, SceneNode};

/// Inserts a node into the scene. The id assigned on first execution is
/// remembered so redo (and replay from a persisted history) re-inserts the
/// node under the same id.
#[derive(Debug, Clone)]
pub struct AddNodeCommand {
    id: Option<NodeId>,
    node: SceneNode,
}

impl AddNodeCommand {
    /// Registry kind string.
    pub const KIND: &'static str = "AddNode";

    /// Add `node` to the scene.
    #[must_use]
    pub fn new(node: SceneNode) -> Self {
        Self { id: None, node }
    }

    /// Blank factory for the command registry.
    #[must_use]
    pub fn blank() -> Box<dyn Command> {
        Box::new(Self {
            id: None,
            node: SceneNode::default(),
        })
    }

    /// The id assigned to the inserted node, once executed.
    #[must_use]
    pub fn node_id(&self) -> Option<NodeId> {
        self.id
    }
}

impl Command for AddNodeCommand {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn display_name(&self) -> String {
        format!("Add {}", self.node.name)
    }

    fn target(&self) -> Option<NodeId> {
        self.id
    }

    fn execute(&mut self, scene: &mut Scene) {
        match self.id {
            Some(id) => scene.insert_with_id(id, self.node.clone()),
            None => self.id = Some(scene.insert(self.node.clone())),
        }
    }

    fn undo(&mut self, scene: &mut Scene) {
        if let Some(id) = self.id {
            let _ = scene.remove(id);
        }
    }

    fn to_json(&self) -> Value {
        json!({
            "type": Self::KIND,
            "node_id": self.id,
            "node": self.node,
        })
    }

    fn load_json(&mut self, json: &Value) -> Result<(), HistoryError> {
        self.id = json_field(json, Self::KIND, "node_id")?;
        self.node = json_field(json, Self::KIND, "node")?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Removes a node from the scene, snapshotting it (and the children the
/// removal detached) so undo restores the exact hierarchy.
#[derive(Debug, Clone)]
pub struct RemoveNodeCommand {
    id: NodeId,
    saved: Option<SceneNode>,
    detached: Vec<NodeId>,
}

impl RemoveNodeCommand {
    /// Registry kind string.
    pub const KIND: &'static str = "RemoveNode";

    /// Remove the node with the given id.
    #[must_use]
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            saved: None,
            detached: Vec::new(),
        }
    }

    /// Blank factory for the command registry.
    #[must_use]
    pub fn blank() -> Box<dyn Command> {
        Box::new(Self::new(NodeId(0)))
    }
}

impl Command for RemoveNodeCommand {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn display_name(&self) -> String {
        match &self.saved {
            Some(node) => format!("Remove {}", node.name),
            None => "Remove node".to_owned(),
        }
    }

    fn target(&self) -> Option<NodeId> {
        Some(self.id)
    }

    fn execute(&mut self, scene: &mut Scene) {
        if let Some((node, detached)) = scene.remove(self.id) {
            self.saved = Some(node);
            self.detached = detached;
        }
    }

    fn undo(&mut self, scene: &mut Scene) {
        let Some(node) = self.saved.clone() else {
            return;
        };
        scene.insert_with_id(self.id, node);
        for child in &self.detached {
            if let Some(child_node) = scene.node_mut(*child) {
                child_node.parent = Some(self.id);
            }
        }
    }

    fn to_json(&self) -> Value {
        json!({
            "type": Self::KIND,
            "node_id": self.id,
            "saved": self.saved,
            "detached": self.detached,
        })
    }

    fn load_json(&mut self, json: &Value) -> Result<(), HistoryError> {
        self.id = json_field(json, Self::KIND, "node_id")?;
        self.saved = json_field(json, Self::KIND, "saved")?;
        self.detached = json_field(json, Self::KIND, "detached")?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
