//! Record collections submitted to the service.
//!
//! Items, policies and instructions are defined by the service, so they are
//! carried as raw JSON and only checked for their required keys.

use serde_json::Value;
use std::path::{Path, PathBuf};

use super::read_json_file;
use crate::errors::{GeniusError, GeniusResult};

/// Metadata entry name the service computes itself and rejects on update.
pub const COMPUTED_METADATA_NAME: &str = "available";

/// Either records held in memory or a JSON file containing an array of them.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordSource {
    /// Records already in memory.
    Inline(Vec<Value>),
    /// Path to a JSON file holding an array of records.
    File(PathBuf),
}

impl RecordSource {
    /// Resolves the source into a record collection.
    pub fn load(self) -> GeniusResult<Vec<Value>> {
        match self {
            RecordSource::Inline(records) => Ok(records),
            RecordSource::File(path) => match read_json_file(&path)? {
                Value::Array(records) => Ok(records),
                _ => Err(GeniusError::config_load(
                    &path,
                    "expected a JSON array of records",
                )),
            },
        }
    }
}

impl From<Vec<Value>> for RecordSource {
    fn from(records: Vec<Value>) -> Self {
        RecordSource::Inline(records)
    }
}

impl From<Value> for RecordSource {
    /// An array becomes its elements; any other value a single record.
    fn from(value: Value) -> Self {
        match value {
            Value::Array(records) => RecordSource::Inline(records),
            other => RecordSource::Inline(vec![other]),
        }
    }
}

impl From<PathBuf> for RecordSource {
    fn from(path: PathBuf) -> Self {
        RecordSource::File(path)
    }
}

impl From<&Path> for RecordSource {
    fn from(path: &Path) -> Self {
        RecordSource::File(path.to_path_buf())
    }
}

impl From<&PathBuf> for RecordSource {
    fn from(path: &PathBuf) -> Self {
        RecordSource::File(path.clone())
    }
}

/// Removes metadata entries named [`COMPUTED_METADATA_NAME`] from an item.
///
/// Other entries keep their order. Items without a `metadata` array are left
/// untouched.
pub fn strip_computed_metadata(item: &mut Value) {
    if let Some(Value::Array(metadata)) = item.get_mut("metadata") {
        metadata.retain(|entry| {
            entry.get("name").and_then(Value::as_str) != Some(COMPUTED_METADATA_NAME)
        });
    }
}
