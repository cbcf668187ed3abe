//! Centralized editor options with TOML preset support.
//!
//! Tweakable settings for picking and the undo history are consolidated
//! here. Options serialize to/from TOML so editors can persist user
//! preferences between sessions.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::StagehandError;
use crate::picking::SelectMode;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[picking]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// GPU picking parameters.
    pub picking: PickingOptions,
    /// Undo history parameters.
    pub history: HistoryOptions,
}

/// GPU picking parameters.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema,
)]
#[serde(default)]
pub struct PickingOptions {
    /// Whether picking runs at all.
    pub enabled: bool,
    /// Whether hits select composite roots or exact nodes.
    pub select_mode: SelectMode,
    /// Minimum interval between picks, in milliseconds.
    pub throttle_ms: u64,
}

impl Default for PickingOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            select_mode: SelectMode::Whole,
            throttle_ms: 10,
        }
    }
}

/// Undo history parameters.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema,
)]
#[serde(default)]
pub struct HistoryOptions {
    /// Coalescing window for rapid successive edits, in milliseconds.
    pub coalesce_window_ms: u64,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            coalesce_window_ms: 500,
        }
    }
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`StagehandError::Io`] if the file cannot be read, or
    /// [`StagehandError::OptionsParse`] if the TOML is invalid.
    pub fn load(path: &Path) -> Result<Self, StagehandError> {
        let content =
            std::fs::read_to_string(path).map_err(StagehandError::Io)?;
        toml::from_str(&content)
            .map_err(|e| StagehandError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`StagehandError::OptionsParse`] if serialization fails, or
    /// [`StagehandError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), StagehandError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| StagehandError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(StagehandError::Io)?;
        }
        std::fs::write(path, content).map_err(StagehandError::Io)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let parsed: Options =
            toml::from_str("[picking]\nenabled = false\n").unwrap();
        assert!(!parsed.picking.enabled);
        assert_eq!(parsed.picking.throttle_ms, 10);
        assert_eq!(parsed.history.coalesce_window_ms, 500);
    }

    #[test]
    fn select_mode_parses_from_snake_case() {
        let parsed: Options =
            toml::from_str("[picking]\nselect_mode = \"part\"\n").unwrap();
        assert_eq!(parsed.picking.select_mode, SelectMode::Part);
    }

    #[test]
    fn schema_generation_succeeds() {
        let schema = Options::json_schema();
        let json = serde_json::to_value(&schema).unwrap();
        assert!(json.get("properties").is_some());
    }
}
