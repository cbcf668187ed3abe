//! Built-in command types.

mod add_remove;
mod set_script;
mod set_transform;
mod set_visible;

pub use add_remove::{AddNodeCommand, RemoveNodeCommand};
use serde_json::Value;
pub use set_script::SetScriptCommand;
pub use set_transform::{SetTransformCommand, TransformComponent};
pub use set_visible::SetVisibleCommand;

use super::HistoryError;

/// Extract and deserialize one field of a persisted command, mapping
/// failures to [`HistoryError::MalformedCommand`].
pub(crate) fn json_field<T: serde::de::DeserializeOwned>(
    json: &Value,
    kind: &'static str,
    name: &str,
) -> Result<T, HistoryError> {
    let value = json
        .get(name)
        .ok_or_else(|| HistoryError::MalformedCommand {
            kind: kind.to_owned(),
            reason: format!("missing field {name:?}"),
        })?;
    serde_json::from_value(value.clone()).map_err(|e| {
        HistoryError::MalformedCommand {
            kind: kind.to_owned(),
            reason: format!("field {name:?}: {e}"),
        }
    })
}
