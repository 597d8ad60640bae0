//! Local checks run before any record leaves the process.

use serde_json::Value;

use crate::errors::{GeniusError, GeniusResult};

/// Keys every item must carry.
pub const ITEM_REQUIRED_FIELDS: [&str; 4] = ["title", "description", "external_url", "image_url"];

/// Key every policy must carry.
pub const POLICY_REQUIRED_FIELDS: [&str; 1] = ["policy"];

/// Key every legacy instruction must carry.
pub const INSTRUCTION_REQUIRED_FIELDS: [&str; 1] = ["promptlet"];

/// Checks that every item has the required keys.
pub fn validate_items(records: &[Value]) -> GeniusResult<()> {
    require_fields("item", records, &ITEM_REQUIRED_FIELDS)
}

/// Checks that every policy has a `policy` key.
pub fn validate_policies(records: &[Value]) -> GeniusResult<()> {
    require_fields("policy", records, &POLICY_REQUIRED_FIELDS)
}

/// Checks that every legacy instruction has a `promptlet` key.
pub fn validate_instructions(records: &[Value]) -> GeniusResult<()> {
    require_fields("instruction", records, &INSTRUCTION_REQUIRED_FIELDS)
}

/// Rejects an empty upload before any validation of its content.
pub(crate) fn require_non_empty(kind: &str, records: &[Value]) -> GeniusResult<()> {
    if records.is_empty() {
        return Err(GeniusError::Validation {
            message: format!("no {kind} records were loaded or passed"),
            field: None,
            record: Value::Array(Vec::new()),
        });
    }
    Ok(())
}

fn require_fields(kind: &str, records: &[Value], fields: &[&str]) -> GeniusResult<()> {
    for record in records {
        let Some(object) = record.as_object() else {
            return Err(GeniusError::Validation {
                message: format!("{kind} must be a JSON object, got {record}"),
                field: None,
                record: record.clone(),
            });
        };

        if let Some(missing) = fields.iter().find(|field| !object.contains_key(**field)) {
            return Err(GeniusError::missing_field(kind, missing, record));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn item() -> Value {
        json!({"title": "a", "description": "b", "external_url": "c", "image_url": "d"})
    }

    #[test]
    fn test_validate_items_accepts_complete_item() {
        assert!(validate_items(&[item()]).is_ok());
    }

    #[test]
    fn test_validate_items_ignores_extra_keys() {
        let mut record = item();
        record["metadata"] = json!([{"name": "legs", "value": 4}]);
        record["price"] = json!(10);
        assert!(validate_items(&[record]).is_ok());
    }

    #[test_case("title")]
    #[test_case("description")]
    #[test_case("external_url")]
    #[test_case("image_url")]
    fn test_validate_items_rejects_missing_key(field: &str) {
        let mut record = item();
        record.as_object_mut().unwrap().remove(field);
        record["extra"] = json!("kept");

        match validate_items(&[item(), record.clone()]) {
            Err(GeniusError::Validation {
                field: Some(missing),
                record: offending,
                ..
            }) => {
                assert_eq!(missing, field);
                assert_eq!(offending, record);
            }
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_items_rejects_non_object() {
        assert!(matches!(
            validate_items(&[json!("title")]),
            Err(GeniusError::Validation { field: None, .. })
        ));
    }

    #[test]
    fn test_validate_policies() {
        assert!(validate_policies(&[json!({"policy": "Prefer red items"})]).is_ok());
        assert!(validate_policies(&[json!({"promptlet": "legacy"})]).is_err());
    }

    #[test]
    fn test_validate_instructions() {
        assert!(validate_instructions(&[json!({"promptlet": "Prefer red items"})]).is_ok());
        assert!(validate_instructions(&[json!({"policy": "current"})]).is_err());
    }

    #[test]
    fn test_empty_collections_pass_content_checks() {
        assert!(validate_items(&[]).is_ok());
        assert!(require_non_empty("item", &[]).is_err());
        assert!(require_non_empty("item", &[item()]).is_ok());
    }
}
