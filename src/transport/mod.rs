//! HTTP transport layer for the Genius client.
//!
//! Services build [`HttpRequest`] values and hand them to an
//! [`HttpTransport`]; the default implementation is backed by `reqwest`.

mod http;

pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, HttpTransportImpl};

use std::time::Duration;

use crate::errors::GeniusError;

/// Transport error types.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection error.
    #[error("Connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Timeout error.
    #[error("Timeout after {timeout:?}")]
    Timeout {
        /// Timeout duration.
        timeout: Duration,
    },

    /// Invalid response.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}

impl From<TransportError> for GeniusError {
    fn from(err: TransportError) -> Self {
        GeniusError::Network {
            message: err.to_string(),
        }
    }
}
