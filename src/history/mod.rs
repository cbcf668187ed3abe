//! Linear undo/redo command history with coalescing and replay.
//!
//! The history owns two stacks of [`HistoryEntry`]: `undos` (applied
//! commands, oldest first) and `redos` (reverted commands, most recently
//! undone on top). Rapid successive edits to the same attribute of the
//! same node coalesce into a single entry inside a fixed time window, so a
//! slider drag produces one undo step instead of one per frame.
//!
//! Persisted histories are replayed lazily: [`History::from_json`] builds
//! placeholder entries that only rehydrate (via the command registry and
//! each command's stored JSON) the first time undo/redo touches them.

mod command;
pub mod commands;
mod registry;

use std::collections::VecDeque;
use std::fmt;

pub use command::Command;
pub use registry::{CommandFactory, CommandRegistry};
use serde_json::{json, Value};
use web_time::{Duration, Instant};

use crate::scene::Scene;

/// Default coalescing window: edits closer together than this merge into
/// the preceding entry.
pub const COALESCE_WINDOW: Duration = Duration::from_millis(500);

// ---------------------------------------------------------------------------
// Errors and events
// ---------------------------------------------------------------------------

/// Errors produced while persisting or rehydrating history entries.
#[derive(Debug)]
pub enum HistoryError {
    /// A persisted command's `type` string has no registered factory.
    UnknownCommandType(String),
    /// A persisted command is missing fields or has the wrong shape.
    MalformedCommand {
        /// The command kind being rehydrated.
        kind: String,
        /// What was wrong.
        reason: String,
    },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommandType(kind) => {
                write!(f, "unknown command type {kind:?}")
            }
            Self::MalformedCommand { kind, reason } => {
                write!(f, "malformed {kind} command: {reason}")
            }
        }
    }
}

impl std::error::Error for HistoryError {}

/// Identity of the command an event refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    /// History-assigned id.
    pub id: i32,
    /// Display name (possibly overridden at execute time).
    pub name: String,
    /// Command kind string.
    pub kind: String,
}

/// Emitted whenever the history changes. Drained by the embedding editor
/// via [`History::drain_events`] to refresh undo/redo UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEvent {
    /// The stacks changed. Carries the acting command, or `None` when the
    /// history was cleared or emptied.
    Changed(Option<CommandInfo>),
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// One slot in the undo or redo stack: a command plus history bookkeeping.
pub struct HistoryEntry {
    cmd: Box<dyn Command>,
    id: i32,
    name: String,
    /// Whether live in-process state backs this command. `false` for
    /// deserialized placeholders that have not yet been rehydrated.
    in_memory: bool,
    /// Cached persisted form, if one exists.
    json: Option<Value>,
}

impl HistoryEntry {
    /// History-assigned id (monotonic, never reused).
    #[must_use]
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Command kind string.
    #[must_use]
    pub fn kind(&self) -> &str {
        self.cmd.kind()
    }

    /// Whether the command has live state (vs. an unreplayed placeholder).
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.in_memory
    }

    /// The cached persisted form, if any.
    #[must_use]
    pub fn persisted(&self) -> Option<&Value> {
        self.json.as_ref()
    }

    fn info(&self) -> CommandInfo {
        CommandInfo {
            id: self.id,
            name: self.name.clone(),
            kind: self.cmd.kind().to_owned(),
        }
    }

    /// Rehydrate a placeholder from its stored JSON. No-op for live
    /// entries.
    fn ensure_live(&mut self) -> Result<(), HistoryError> {
        if self.in_memory {
            return Ok(());
        }
        let json =
            self.json
                .clone()
                .ok_or_else(|| HistoryError::MalformedCommand {
                    kind: self.cmd.kind().to_owned(),
                    reason: "placeholder entry has no stored JSON".to_owned(),
                })?;
        self.cmd.load_json(&json)?;
        self.in_memory = true;
        Ok(())
    }

    /// Persisted form: the cached JSON if present, otherwise serialized on
    /// demand, always overlaid with the entry's id and name.
    fn to_json(&self) -> Value {
        let mut value =
            self.json.clone().unwrap_or_else(|| self.cmd.to_json());
        if let Value::Object(map) = &mut value {
            let _ = map.insert("id".to_owned(), json!(self.id));
            let _ = map.insert("name".to_owned(), json!(self.name));
        }
        value
    }
}

impl fmt::Debug for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryEntry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.cmd.kind())
            .field("in_memory", &self.in_memory)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// The linear undo/redo history.
///
/// Re-entrancy: calling `execute`/`undo`/`redo` from within a command's own
/// `execute`/`undo` would corrupt stack ordering; callers must not do it.
pub struct History {
    undos: Vec<HistoryEntry>,
    redos: Vec<HistoryEntry>,
    id_counter: i32,
    last_cmd_time: Option<Instant>,
    coalesce_window: Duration,
    events: VecDeque<HistoryEvent>,
}

impl History {
    /// An empty history with the default coalescing window.
    #[must_use]
    pub fn new() -> Self {
        Self {
            undos: Vec::new(),
            redos: Vec::new(),
            id_counter: 0,
            last_cmd_time: None,
            coalesce_window: COALESCE_WINDOW,
            events: VecDeque::new(),
        }
    }

    /// Override the coalescing window (tests and editors with different
    /// drag cadences).
    pub fn set_coalesce_window(&mut self, window: Duration) {
        self.coalesce_window = window;
    }

    /// Apply a command and push it onto the undo stack, or coalesce it into
    /// the stack top when it continues a rapid edit of the same attribute.
    ///
    /// Coalescing requires: both commands updatable, same target, same
    /// kind, same script, same attribute, and the wall-clock gap since the
    /// previous `execute` under the coalescing window. A merged entry's
    /// cached JSON is invalidated since it no longer reflects the end
    /// state.
    ///
    /// Always clears the redo stack: branching history is not supported.
    pub fn execute(
        &mut self,
        scene: &mut Scene,
        mut cmd: Box<dyn Command>,
        optional_name: Option<&str>,
    ) {
        let now = Instant::now();
        let within_window = self
            .last_cmd_time
            .is_some_and(|t| now.duration_since(t) < self.coalesce_window);

        let coalesce = within_window
            && self.undos.last().is_some_and(|last| {
                last.in_memory
                    && last.cmd.is_updatable()
                    && cmd.is_updatable()
                    && last.cmd.target() == cmd.target()
                    && last.cmd.kind() == cmd.kind()
                    && last.cmd.script() == cmd.script()
                    && last.cmd.attribute() == cmd.attribute()
            });

        if coalesce {
            // merge the new end state into the stack top and re-apply
            if let Some(last) = self.undos.last_mut() {
                last.cmd.absorb(cmd.as_ref());
                if let Some(name) = optional_name {
                    last.name = name.to_owned();
                }
                last.json = None;
                last.cmd.execute(scene);
            }
        } else {
            self.id_counter += 1;
            let name = optional_name
                .map_or_else(|| cmd.display_name(), ToOwned::to_owned);
            cmd.execute(scene);
            self.undos.push(HistoryEntry {
                cmd,
                id: self.id_counter,
                name,
                in_memory: true,
                json: None,
            });
        }

        self.last_cmd_time = Some(now);
        self.redos.clear();
        self.notify_top();
    }

    /// Reverse the most recent command, moving it to the redo stack.
    /// Returns the undone command's id, or `Ok(None)` when the undo stack
    /// is empty (a non-erroneous no-op).
    ///
    /// # Errors
    ///
    /// Propagates rehydration failures for placeholder entries.
    pub fn undo(
        &mut self,
        scene: &mut Scene,
    ) -> Result<Option<i32>, HistoryError> {
        let Some(mut entry) = self.undos.pop() else {
            return Ok(None);
        };
        entry.ensure_live()?;
        entry.cmd.undo(scene);
        let id = entry.id;
        self.events.push_back(HistoryEvent::Changed(Some(entry.info())));
        self.redos.push(entry);
        Ok(Some(id))
    }

    /// Reapply the most recently undone command, moving it back to the
    /// undo stack. Returns its id, or `Ok(None)` when the redo stack is
    /// empty.
    ///
    /// # Errors
    ///
    /// Propagates rehydration failures for placeholder entries.
    pub fn redo(
        &mut self,
        scene: &mut Scene,
    ) -> Result<Option<i32>, HistoryError> {
        let Some(mut entry) = self.redos.pop() else {
            return Ok(None);
        };
        entry.ensure_live()?;
        entry.cmd.execute(scene);
        let id = entry.id;
        self.events.push_back(HistoryEvent::Changed(Some(entry.info())));
        self.undos.push(entry);
        Ok(Some(id))
    }

    /// Navigate to the point immediately after the command with the given
    /// id, by a pure sequence of `undo`/`redo` calls. An id below every
    /// existing id (conventionally `-1`) rewinds to the very start.
    ///
    /// # Errors
    ///
    /// Propagates rehydration failures from the underlying undo/redo calls.
    pub fn go_to_state(
        &mut self,
        scene: &mut Scene,
        id: i32,
    ) -> Result<(), HistoryError> {
        let top = self.undos.last().map(HistoryEntry::id);
        if top.is_none_or(|top_id| id > top_id) {
            // forward: redo while the next candidate is at or before the
            // target
            while self
                .redos
                .last()
                .is_some_and(|candidate| candidate.id <= id)
            {
                if self.redo(scene)?.is_none() {
                    break;
                }
            }
        } else {
            // backward: undo until the stack top reaches the target (or
            // the stack empties for a below-all target)
            while self.undos.last().is_some_and(|top| top.id > id) {
                if self.undo(scene)?.is_none() {
                    break;
                }
            }
        }
        self.notify_top();
        Ok(())
    }

    /// Guarantee every entry in both stacks has a persisted form, by
    /// rewinding to the start and redoing through the entire sequence,
    /// serializing as it goes, then returning to the position identified by
    /// `id`.
    ///
    /// # Errors
    ///
    /// Propagates rehydration failures from the underlying replay.
    pub fn enable_serialization(
        &mut self,
        scene: &mut Scene,
        id: i32,
    ) -> Result<(), HistoryError> {
        self.go_to_state(scene, -1)?;
        while self.redo(scene)?.is_some() {
            if let Some(entry) = self.undos.last_mut() {
                if entry.json.is_none() {
                    entry.json = Some(entry.to_json());
                }
            }
        }
        self.go_to_state(scene, id)
    }

    /// Persisted shape `{ undos: [...], redos: [...] }`. Entries without a
    /// cached form are serialized on demand, so no entry is ever silently
    /// dropped.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let undos: Vec<Value> =
            self.undos.iter().map(HistoryEntry::to_json).collect();
        let redos: Vec<Value> =
            self.redos.iter().map(HistoryEntry::to_json).collect();
        json!({ "undos": undos, "redos": redos })
    }

    /// Load placeholder entries from a persisted history. Placeholders are
    /// not applied to the scene; they rehydrate the first time undo/redo
    /// touches them. `id_counter` advances to at least the largest
    /// persisted id so later executions never collide.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::UnknownCommandType`] for unregistered kinds
    /// and [`HistoryError::MalformedCommand`] for entries without a usable
    /// `type` field.
    pub fn from_json(
        &mut self,
        registry: &CommandRegistry,
        json: &Value,
    ) -> Result<(), HistoryError> {
        for cmd_json in stack_array(json, "undos") {
            let entry = self.placeholder(registry, cmd_json)?;
            self.undos.push(entry);
        }
        for cmd_json in stack_array(json, "redos") {
            let entry = self.placeholder(registry, cmd_json)?;
            self.redos.push(entry);
        }
        self.notify_top();
        Ok(())
    }

    /// Drop everything and reset the id counter.
    pub fn clear(&mut self) {
        self.undos.clear();
        self.redos.clear();
        self.id_counter = 0;
        self.last_cmd_time = None;
        self.events.push_back(HistoryEvent::Changed(None));
    }

    /// Entries currently on the undo stack, oldest first.
    #[must_use]
    pub fn undo_entries(&self) -> &[HistoryEntry] {
        &self.undos
    }

    /// Entries currently on the redo stack, most recently undone last
    /// (i.e. the stack top is the final element).
    #[must_use]
    pub fn redo_entries(&self) -> &[HistoryEntry] {
        &self.redos
    }

    /// Id of the undo-stack top, if any.
    #[must_use]
    pub fn top_id(&self) -> Option<i32> {
        self.undos.last().map(HistoryEntry::id)
    }

    /// Current value of the monotonic id counter.
    #[must_use]
    pub fn id_counter(&self) -> i32 {
        self.id_counter
    }

    /// Drain all pending history-changed events.
    pub fn drain_events(&mut self) -> Vec<HistoryEvent> {
        self.events.drain(..).collect()
    }

    fn placeholder(
        &mut self,
        registry: &CommandRegistry,
        cmd_json: &Value,
    ) -> Result<HistoryEntry, HistoryError> {
        let kind = cmd_json.get("type").and_then(Value::as_str).ok_or_else(
            || HistoryError::MalformedCommand {
                kind: "<unknown>".to_owned(),
                reason: "persisted entry has no \"type\" field".to_owned(),
            },
        )?;
        let cmd = registry
            .create(kind)
            .ok_or_else(|| HistoryError::UnknownCommandType(kind.to_owned()))?;
        let id = cmd_json.get("id").and_then(Value::as_i64).unwrap_or(0) as i32;
        let name = cmd_json
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        self.id_counter = self.id_counter.max(id);
        Ok(HistoryEntry {
            cmd,
            id,
            name,
            in_memory: false,
            json: Some(cmd_json.clone()),
        })
    }

    fn notify_top(&mut self) {
        let info = self.undos.last().map(HistoryEntry::info);
        self.events.push_back(HistoryEvent::Changed(info));
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

fn stack_array<'a>(
    json: &'a Value,
    key: &str,
) -> impl Iterator<Item = &'a Value> {
    json.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use glam::Vec3;

    use super::commands::{AddNodeCommand, SetTransformCommand};
    use super::*;
    use crate::scene::{NodeId, SceneNode};

    fn scene_with_node() -> (Scene, NodeId) {
        let mut scene = Scene::new();
        let id = scene.insert(SceneNode::named("box"));
        (scene, id)
    }

    fn translate(
        scene: &Scene,
        node: NodeId,
        x: f32,
    ) -> Box<dyn Command> {
        Box::new(SetTransformCommand::translate(
            scene,
            node,
            Vec3::new(x, 0.0, 0.0),
        ))
    }

    fn push_translate(
        history: &mut History,
        scene: &mut Scene,
        node: NodeId,
        x: f32,
    ) {
        let cmd = translate(scene, node, x);
        history.execute(scene, cmd, None);
    }

    /// A large window so consecutive executes always fall inside it.
    const WIDE: Duration = Duration::from_secs(3600);

    #[test]
    fn commands_inside_window_coalesce() {
        let (mut scene, node) = scene_with_node();
        let mut history = History::new();
        history.set_coalesce_window(WIDE);

        let cmd = translate(&scene, node, 1.0);
        history.execute(&mut scene, cmd, None);
        let cmd = translate(&scene, node, 2.0);
        history.execute(&mut scene, cmd, None);

        assert_eq!(history.undo_entries().len(), 1);
        assert_eq!(
            scene.node(node).unwrap().transform.translation.x,
            2.0
        );

        // one undo reverts the whole merged edit
        let _ = history.undo(&mut scene).unwrap();
        assert_eq!(
            scene.node(node).unwrap().transform.translation.x,
            0.0
        );
    }

    #[test]
    fn commands_outside_window_do_not_coalesce() {
        let (mut scene, node) = scene_with_node();
        let mut history = History::new();
        history.set_coalesce_window(Duration::ZERO);

        push_translate(&mut history, &mut scene, node, 1.0);
        push_translate(&mut history, &mut scene, node, 2.0);

        assert_eq!(history.undo_entries().len(), 2);
    }

    #[test]
    fn different_attributes_do_not_coalesce() {
        let (mut scene, node) = scene_with_node();
        let mut history = History::new();
        history.set_coalesce_window(WIDE);

        push_translate(&mut history, &mut scene, node, 1.0);
        let scale = Box::new(SetTransformCommand::scale(
            &scene,
            node,
            Vec3::splat(2.0),
        ));
        history.execute(&mut scene, scale, None);

        assert_eq!(history.undo_entries().len(), 2);
    }

    #[test]
    fn different_targets_do_not_coalesce() {
        let mut scene = Scene::new();
        let a = scene.insert(SceneNode::named("a"));
        let b = scene.insert(SceneNode::named("b"));
        let mut history = History::new();
        history.set_coalesce_window(WIDE);

        push_translate(&mut history, &mut scene, a, 1.0);
        push_translate(&mut history, &mut scene, b, 1.0);

        assert_eq!(history.undo_entries().len(), 2);
    }

    #[test]
    fn execute_clears_redo_branch() {
        let (mut scene, node) = scene_with_node();
        let mut history = History::new();
        history.set_coalesce_window(Duration::ZERO);

        push_translate(&mut history, &mut scene, node, 1.0);
        push_translate(&mut history, &mut scene, node, 2.0);
        let _ = history.undo(&mut scene).unwrap();
        assert_eq!(history.redo_entries().len(), 1);

        push_translate(&mut history, &mut scene, node, 9.0);
        assert!(history.redo_entries().is_empty());
    }

    #[test]
    fn ids_are_strictly_increasing_from_one() {
        let (mut scene, node) = scene_with_node();
        let mut history = History::new();
        history.set_coalesce_window(Duration::ZERO);

        for x in 0..5 {
            push_translate(&mut history, &mut scene, node, x as f32);
        }
        let ids: Vec<i32> =
            history.undo_entries().iter().map(HistoryEntry::id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn empty_stack_undo_redo_are_noops() {
        let mut scene = Scene::new();
        let mut history = History::new();
        assert_eq!(history.undo(&mut scene).unwrap(), None);
        assert_eq!(history.redo(&mut scene).unwrap(), None);
    }

    #[test]
    fn go_to_state_splits_stacks_correctly() {
        let (mut scene, node) = scene_with_node();
        let mut history = History::new();
        history.set_coalesce_window(Duration::ZERO);

        for x in 1..=5 {
            push_translate(&mut history, &mut scene, node, x as f32);
        }

        history.go_to_state(&mut scene, 3).unwrap();
        let undo_ids: Vec<i32> =
            history.undo_entries().iter().map(HistoryEntry::id).collect();
        let redo_ids: Vec<i32> =
            history.redo_entries().iter().map(HistoryEntry::id).collect();
        assert_eq!(undo_ids, vec![1, 2, 3]);
        // stack order: 5 was undone first, 4 sits on top
        assert_eq!(redo_ids, vec![5, 4]);
        assert_eq!(
            scene.node(node).unwrap().transform.translation.x,
            3.0
        );

        history.go_to_state(&mut scene, -1).unwrap();
        assert!(history.undo_entries().is_empty());
        assert_eq!(history.redo_entries().len(), 5);

        history.go_to_state(&mut scene, 5).unwrap();
        assert_eq!(history.undo_entries().len(), 5);
        assert_eq!(
            scene.node(node).unwrap().transform.translation.x,
            5.0
        );
    }

    #[test]
    fn go_to_state_at_start_is_stable() {
        let (mut scene, node) = scene_with_node();
        let mut history = History::new();
        history.set_coalesce_window(Duration::ZERO);
        push_translate(&mut history, &mut scene, node, 1.0);

        history.go_to_state(&mut scene, -1).unwrap();
        assert!(history.undo_entries().is_empty());
        // already at the start: going there again must not redo anything
        history.go_to_state(&mut scene, -1).unwrap();
        assert!(history.undo_entries().is_empty());
        assert_eq!(history.redo_entries().len(), 1);
    }

    #[test]
    fn enable_serialization_backfills_every_entry() {
        let (mut scene, node) = scene_with_node();
        let mut history = History::new();
        history.set_coalesce_window(Duration::ZERO);

        for x in 1..=4 {
            push_translate(&mut history, &mut scene, node, x as f32);
        }
        history.go_to_state(&mut scene, 2).unwrap();
        let top_before = history.top_id();

        history.enable_serialization(&mut scene, 2).unwrap();

        assert!(history
            .undo_entries()
            .iter()
            .all(|e| e.persisted().is_some()));
        assert!(history
            .redo_entries()
            .iter()
            .all(|e| e.persisted().is_some()));
        assert_eq!(history.top_id(), top_before);
    }

    #[test]
    fn json_round_trip_preserves_ids_and_continues_counter() {
        let (mut scene, node) = scene_with_node();
        let mut history = History::new();
        history.set_coalesce_window(Duration::ZERO);

        for x in 1..=3 {
            push_translate(&mut history, &mut scene, node, x as f32);
        }
        let json = history.to_json();

        let registry = CommandRegistry::builtin();
        let mut restored = History::new();
        restored.from_json(&registry, &json).unwrap();

        let ids: Vec<i32> = restored
            .undo_entries()
            .iter()
            .map(HistoryEntry::id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(restored
            .undo_entries()
            .iter()
            .all(|e| !e.is_in_memory()));
        assert!(restored.id_counter() >= 3);

        // new executions continue the sequence without collision
        push_translate(&mut restored, &mut scene, node, 9.0);
        assert_eq!(restored.top_id(), Some(4));
    }

    #[test]
    fn placeholders_rehydrate_on_first_undo() {
        let (mut scene, node) = scene_with_node();
        let mut history = History::new();
        history.set_coalesce_window(Duration::ZERO);
        push_translate(&mut history, &mut scene, node, 7.0);
        let json = history.to_json();

        // fresh session: scene still holds the applied state
        let registry = CommandRegistry::builtin();
        let mut restored = History::new();
        restored.from_json(&registry, &json).unwrap();
        assert!(!restored.undo_entries()[0].is_in_memory());

        let undone = restored.undo(&mut scene).unwrap();
        assert_eq!(undone, Some(1));
        assert!(restored.redo_entries()[0].is_in_memory());
        assert_eq!(
            scene.node(node).unwrap().transform.translation.x,
            0.0
        );
    }

    #[test]
    fn from_json_rejects_unknown_kind() {
        let registry = CommandRegistry::builtin();
        let mut history = History::new();
        let json = json!({
            "undos": [{ "type": "Teleport", "id": 1, "name": "nope" }],
            "redos": [],
        });
        assert!(matches!(
            history.from_json(&registry, &json),
            Err(HistoryError::UnknownCommandType(_))
        ));
    }

    #[test]
    fn clear_resets_counter_and_stacks() {
        let (mut scene, node) = scene_with_node();
        let mut history = History::new();
        history.set_coalesce_window(Duration::ZERO);
        push_translate(&mut history, &mut scene, node, 1.0);

        history.clear();
        assert!(history.undo_entries().is_empty());
        assert!(history.redo_entries().is_empty());
        assert_eq!(history.id_counter(), 0);

        push_translate(&mut history, &mut scene, node, 2.0);
        assert_eq!(history.top_id(), Some(1));
    }

    #[test]
    fn optional_name_overrides_display_name() {
        let (mut scene, node) = scene_with_node();
        let mut history = History::new();
        let cmd = translate(&scene, node, 1.0);
        history.execute(&mut scene, cmd, Some("Nudge right"));
        assert_eq!(history.undo_entries()[0].name(), "Nudge right");
    }

    #[test]
    fn events_carry_acting_command() {
        let (mut scene, node) = scene_with_node();
        let mut history = History::new();
        push_translate(&mut history, &mut scene, node, 1.0);

        let events = history.drain_events();
        assert_eq!(events.len(), 1);
        let HistoryEvent::Changed(Some(info)) = &events[0] else {
            panic!("expected a Changed event with command info");
        };
        assert_eq!(info.id, 1);
        assert_eq!(info.kind, "SetTransform");
        assert!(history.drain_events().is_empty());
    }

    #[test]
    fn add_node_replays_under_same_id() {
        let mut scene = Scene::new();
        let mut history = History::new();
        history.set_coalesce_window(Duration::ZERO);

        let add = Box::new(AddNodeCommand::new(SceneNode::named("crate")));
        history.execute(&mut scene, add, None);
        assert_eq!(scene.len(), 1);

        let _ = history.undo(&mut scene).unwrap();
        assert_eq!(scene.len(), 0);
        let _ = history.redo(&mut scene).unwrap();
        assert_eq!(scene.len(), 1);
    }
}
