use std::any::Any;

use serde_json::{json, Value};

use super::json_field;
use crate::history::command::Command;
use crate::history::HistoryError;
use crate::scene::{NodeId, Scene};

/// Shows or hides a node. Not updatable: each toggle is its own entry.
#[derive(Debug, Clone)]
pub struct SetVisibleCommand {
    node: NodeId,
    old: bool,
    new: bool,
}

impl SetVisibleCommand {
    /// Registry kind string.
    pub const KIND: &'static str = "SetVisible";

    /// Set `node`'s visibility to `visible`, remembering the current state.
    #[must_use]
    pub fn new(scene: &Scene, node: NodeId, visible: bool) -> Self {
        Self {
            node,
            old: scene.node(node).is_none_or(|n| n.visible),
            new: visible,
        }
    }

    /// Blank factory for the command registry.
    #[must_use]
    pub fn blank() -> Box<dyn Command> {
        Box::new(Self {
            node: NodeId(0),
            old: true,
            new: true,
        })
    }
}

impl Command for SetVisibleCommand {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn display_name(&self) -> String {
        if self.new { "Show node" } else { "Hide node" }.to_owned()
    }

    fn target(&self) -> Option<NodeId> {
        Some(self.node)
    }

    fn attribute(&self) -> Option<&'static str> {
        Some("visible")
    }

    fn execute(&mut self, scene: &mut Scene) {
        if let Some(node) = scene.node_mut(self.node) {
            node.visible = self.new;
        }
    }

    fn undo(&mut self, scene: &mut Scene) {
        if let Some(node) = scene.node_mut(self.node) {
            node.visible = self.old;
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
