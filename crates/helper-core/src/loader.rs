use std::{fs, path::Path};

use helper_model::ConfigError;
use serde_json::{Map, Value};
use tracing::debug;

/// Reads a task file and returns its top-level JSON object.
pub fn load_task_file(path: &Path) -> Result<Map<String, Value>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    match value {
        Value::Object(map) => {
            debug!(path = %path.display(), keys = map.len(), "task file loaded");
            Ok(map)
        }
        _ => Err(ConfigError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}
