//! The reversible-edit vocabulary.
//!
//! Every discrete user edit (transform drags, visibility toggles, node
//! insertion/removal, script edits) is represented as a [`Command`].
//! Consumers construct commands and pass them to
//! [`History::execute`](super::History::execute); the history owns them
//! from that point on.

use std::any::Any;

use serde_json::Value;

use super::HistoryError;
use crate::scene::{NodeId, Scene};

/// One reversible, replayable unit of scene mutation.
///
/// A command is constructed *before* it has been applied; `execute` applies
/// it and `undo` reverses it. Commands that support coalescing (rapid
/// slider/drag edits folding into one history entry) return `true` from
/// [`is_updatable`](Self::is_updatable) and implement
/// [`absorb`](Self::absorb).
///
/// Persistence: [`to_json`](Self::to_json) must capture everything needed
/// to replay the command in a later session, and
/// [`load_json`](Self::load_json) must restore a blank registry-created
/// instance from that form.
pub trait Command {
    /// Type discriminator, used for coalescing identity and as the registry
    /// key when reconstructing persisted commands.
    fn kind(&self) -> &'static str;

    /// Default display label for history UIs.
    fn display_name(&self) -> String;

    /// The scene node this command edits, if any. Coalescing never merges
    /// commands with different targets.
    fn target(&self) -> Option<NodeId> {
        None
    }

    /// The specific attribute being changed (e.g. `"translation"`), the
    /// finest coalescing discriminator.
    fn attribute(&self) -> Option<&'static str> {
        None
    }

    /// The script this command edits, if any. Script-edit commands on
    /// different scripts must not coalesce even when attached to the same
    /// node.
    fn script(&self) -> Option<&str> {
        None
    }

    /// Whether this command may be merged into an immediately preceding
    /// command of the same kind/target/attribute.
    fn is_updatable(&self) -> bool {
        false
    }

    /// Apply the edit to the scene.
    fn execute(&mut self, scene: &mut Scene);

    /// Reverse the edit. Only called after `execute` has been applied.
    fn undo(&mut self, scene: &mut Scene);

    /// Merge a newer command's end state into this one (coalescing). The
    /// original "before" state is kept so one undo reverts the whole drag.
    ///
    /// Default is a no-op; only updatable commands implement it.
    fn absorb(&mut self, _newer: &dyn Command) {}

    /// Persisted representation. Must include a `"type"` field equal to
    /// [`kind`](Self::kind).
    fn to_json(&self) -> Value;

    /// Restore state from a persisted representation produced by
    /// [`to_json`](Self::to_json), turning a blank placeholder into a live
    /// command.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::MalformedCommand`] when required fields are
    /// missing or of the wrong shape.
    fn load_json(&mut self, json: &Value) -> Result<(), HistoryError>;

    /// Downcast support for [`absorb`](Self::absorb) implementations.
    fn as_any(&self) -> &dyn Any;
}
