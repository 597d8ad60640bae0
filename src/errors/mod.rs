//! Error types for the Genius client.
//!
//! Every failure is surfaced to the immediate caller. Nothing in this crate
//! retries, so there is no retryability classification here.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Genius operations.
pub type GeniusResult<T> = Result<T, GeniusError>;

/// Error type for Genius client operations.
#[derive(Debug, Error)]
pub enum GeniusError {
    /// The client was constructed with an invalid combination of arguments.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// What is wrong with the configuration.
        message: String,
    },

    /// A referenced file is missing, unreadable or lacks required fields.
    #[error("Unable to load {}: {message}", path.display())]
    ConfigLoad {
        /// File that failed to load.
        path: PathBuf,
        /// Reason for the failure.
        message: String,
    },

    /// A record to be submitted is missing a required field.
    #[error("Unable to validate Genius record: {message}")]
    Validation {
        /// Error message describing the validation issue.
        message: String,
        /// The missing field, if the record was an object.
        field: Option<String>,
        /// The offending record.
        record: serde_json::Value,
    },

    /// The service answered with a non-success status.
    #[error("Upstream request failed (HTTP {status})")]
    UpstreamRequest {
        /// HTTP status code.
        status: u16,
        /// Raw response body, when one was returned.
        body: Option<String>,
    },

    /// An operation was invoked in a state that does not allow it.
    #[error("Precondition failed: {message}")]
    Precondition {
        /// Which precondition was violated.
        message: String,
    },

    /// The request never produced a response.
    #[error("Network error: {message}")]
    Network {
        /// Error message.
        message: String,
    },

    /// A response body could not be decoded or lacked expected fields.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// The session file could not be written.
    #[error("Unable to store session at {}: {message}", path.display())]
    Storage {
        /// Target file.
        path: PathBuf,
        /// Reason for the failure.
        message: String,
    },

    /// Resolving batch identifiers into items stopped part-way.
    #[error("Batch resolution failed at item '{failed_id}' after {} resolved: {source}", resolved.len())]
    BatchResolution {
        /// Items resolved before the failure, in batch order.
        resolved: Vec<serde_json::Value>,
        /// Identifier whose lookup failed.
        failed_id: String,
        /// The lookup error.
        #[source]
        source: Box<GeniusError>,
    },
}

impl GeniusError {
    /// Creates an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        GeniusError::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Creates a config load error.
    pub fn config_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        GeniusError::ConfigLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a precondition error.
    pub fn precondition(message: impl Into<String>) -> Self {
        GeniusError::Precondition {
            message: message.into(),
        }
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        GeniusError::Serialization {
            message: message.into(),
        }
    }

    /// Creates a validation error for a record missing `field`.
    pub fn missing_field(kind: &str, field: &str, record: &serde_json::Value) -> Self {
        GeniusError::Validation {
            message: format!("'{field}' field was not found inside of {kind} {record}"),
            field: Some(field.to_string()),
            record: record.clone(),
        }
    }

    /// Returns the HTTP status for upstream failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            GeniusError::UpstreamRequest { status, .. } => Some(*status),
            GeniusError::BatchResolution { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Returns true if the service rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

impl From<serde_json::Error> for GeniusError {
    fn from(err: serde_json::Error) -> Self {
        GeniusError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for GeniusError {
    fn from(err: url::ParseError) -> Self {
        GeniusError::InvalidConfiguration {
            message: format!("Invalid URL: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_field_carries_record() {
        let record = json!({"title": "a"});
        let error = GeniusError::missing_field("item", "description", &record);

        if let GeniusError::Validation { message, field, record: carried } = &error {
            assert!(message.contains("'description'"));
            assert_eq!(field.as_deref(), Some("description"));
            assert_eq!(carried, &record);
        } else {
            panic!("Expected Validation error");
        }
    }

    #[test]
    fn test_status_of_batch_resolution_follows_source() {
        let error = GeniusError::BatchResolution {
            resolved: vec![json!({"id": "1"})],
            failed_id: "2".to_string(),
            source: Box::new(GeniusError::UpstreamRequest {
                status: 401,
                body: None,
            }),
        };

        assert_eq!(error.status(), Some(401));
        assert!(error.is_unauthorized());
        assert!(error.to_string().contains("'2' after 1 resolved"));
    }

    #[test]
    fn test_non_upstream_errors_have_no_status() {
        assert_eq!(GeniusError::precondition("no session").status(), None);
        assert!(!GeniusError::serialization("bad").is_unauthorized());
    }
}
