//! Explicit command-type registry.
//!
//! Persisted histories record each command's kind as a string; rebuilding a
//! live command from that string goes through this registry rather than any
//! ambient global lookup, so the set of reconstructible command types is
//! explicit and testable.

use rustc_hash::FxHashMap;

use super::command::Command;
use super::commands::{
    AddNodeCommand, RemoveNodeCommand, SetScriptCommand, SetTransformCommand,
    SetVisibleCommand,
};

/// Produces a blank command of one kind, ready for
/// [`Command::load_json`](super::Command::load_json).
pub type CommandFactory = fn() -> Box<dyn Command>;

/// Maps command kind strings to blank-command factories.
pub struct CommandRegistry {
    factories: FxHashMap<String, CommandFactory>,
}

impl CommandRegistry {
    /// An empty registry. Most callers want [`builtin`](Self::builtin).
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: FxHashMap::default(),
        }
    }

    /// A registry pre-populated with every built-in command type.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(SetTransformCommand::KIND, SetTransformCommand::blank);
        registry.register(SetVisibleCommand::KIND, SetVisibleCommand::blank);
        registry.register(SetScriptCommand::KIND, SetScriptCommand::blank);
        registry.register(AddNodeCommand::KIND, AddNodeCommand::blank);
        registry.register(RemoveNodeCommand::KIND, RemoveNodeCommand::blank);
        registry
    }

    /// Register a factory for `kind`, replacing any previous registration.
    pub fn register(&mut self, kind: &str, factory: CommandFactory) {
        if self.factories.insert(kind.to_owned(), factory).is_some() {
            log::warn!("command kind {kind:?} registered twice; replacing");
        }
    }

    /// Create a blank command of the given kind, or `None` if the kind is
    /// not registered.
    #[must_use]
    pub fn create(&self, kind: &str) -> Option<Box<dyn Command>> {
        self.factories.get(kind).map(|factory| factory())
    }

    /// Whether `kind` is registered.
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_all_kinds() {
        let registry = CommandRegistry::builtin();
        for kind in [
            "SetTransform",
            "SetVisible",
            "SetScript",
            "AddNode",
            "RemoveNode",
        ] {
            assert!(registry.contains(kind), "missing {kind}");
        }
        assert!(!registry.contains("Teleport"));
    }

    #[test]
    fn create_returns_matching_kind() {
        let registry = CommandRegistry::builtin();
        let cmd = registry.create("SetVisible");
        assert_eq!(cmd.map(|c| c.kind()), Some("SetVisible"));
    }
}
