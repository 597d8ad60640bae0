//! Observability module for the Genius client.
//!
//! Every service operation runs inside a `tracing` span. Lifecycle events
//! such as project creation are logged at info level and request dispatch
//! at debug level. Tokens are only ever logged as a hint.

mod logging;

pub use logging::{LogFormat, LogLevel, LoggingConfig};
