//! Type definitions for the Genius API.

pub mod credentials;
pub mod feed;
pub mod records;

use std::path::Path;

use crate::errors::{GeniusError, GeniusResult};

/// Reads and parses a JSON file, mapping every failure to `ConfigLoad`.
pub(crate) fn read_json_file(path: &Path) -> GeniusResult<serde_json::Value> {
    if !path.exists() {
        return Err(GeniusError::config_load(path, "file does not exist"));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| GeniusError::config_load(path, format!("failed to read file: {e}")))?;

    serde_json::from_str(&content)
        .map_err(|e| GeniusError::config_load(path, format!("invalid JSON: {e}")))
}
