//! Resource services for the Genius API.
//!
//! Each service is a short-lived view over the client: it borrows the
//! transport and the current session and turns one method call into one
//! request. The decoded response body is returned as-is.

mod data;
mod instructions;
mod items;
mod models;
mod policies;
mod project;

pub use data::DataService;
pub use instructions::InstructionsService;
pub use items::ItemsService;
pub use models::{most_recent_model, ModelsService, PromotedModel};
pub use policies::PoliciesService;
pub use project::ProjectService;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

use crate::auth::{AuthProvider, BearerAuth};
use crate::errors::{GeniusError, GeniusResult};
use crate::transport::{HttpRequest, HttpTransport};
use crate::types::credentials::Session;

/// Path prefix of the current API generation.
pub const PLATFORM_PREFIX: &str = "platform";

/// Path prefix of the legacy API generation.
pub const LEGACY_PREFIX: &str = "hackathon";

/// Characters left as-is inside a single path segment (RFC 3986 unreserved).
const PATH_SEGMENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes a value so it occupies exactly one path segment.
///
/// A bare `.` or `..` would still be collapsed by URL normalisation, so
/// their dots are encoded as well.
pub(crate) fn segment(raw: &str) -> String {
    match raw {
        "." => "%2E".to_string(),
        ".." => "%2E%2E".to_string(),
        _ => utf8_percent_encode(raw, PATH_SEGMENT_SET).to_string(),
    }
}

/// What a service needs to dispatch one request.
#[derive(Clone, Copy)]
pub(crate) struct ServiceContext<'a> {
    transport: &'a dyn HttpTransport,
    session: Option<&'a Session>,
    custom_headers: &'a [(String, String)],
}

impl<'a> ServiceContext<'a> {
    pub(crate) fn new(
        transport: &'a dyn HttpTransport,
        session: Option<&'a Session>,
        custom_headers: &'a [(String, String)],
    ) -> Self {
        Self {
            transport,
            session,
            custom_headers,
        }
    }

    /// Returns the session or a precondition error when bootstrapping.
    pub(crate) fn session(&self) -> GeniusResult<&'a Session> {
        self.session.ok_or_else(|| {
            GeniusError::precondition(
                "no active session; create the project or load a saved session first",
            )
        })
    }

    /// Returns the session's project name, encoded as a path segment.
    pub(crate) fn project_segment(&self) -> GeniusResult<String> {
        Ok(segment(self.session()?.project_name()))
    }

    /// Sends a request authenticated with the session token.
    ///
    /// An empty token fails with `Precondition` before dispatch.
    pub(crate) async fn send(&self, request: HttpRequest) -> GeniusResult<Value> {
        let auth = BearerAuth::new(self.session()?);
        auth.validate()?;
        dispatch(self.transport, request, &auth, self.custom_headers).await
    }
}

/// Applies headers and auth, sends, and decodes the response body.
pub(crate) async fn dispatch(
    transport: &dyn HttpTransport,
    mut request: HttpRequest,
    auth: &dyn AuthProvider,
    custom_headers: &[(String, String)],
) -> GeniusResult<Value> {
    for (name, value) in custom_headers {
        request.headers.insert(name.clone(), value.clone());
    }
    auth.apply_auth(&mut request.headers);

    tracing::debug!(
        method = request.method.as_str(),
        path = %request.path,
        scheme = auth.scheme(),
        "Outgoing request"
    );

    transport.send(request).await?.error_for_status()?.json_value()
}

/// Reads a record identifier, which the service sends as a string or number.
pub(crate) fn record_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Expects a JSON array response.
pub(crate) fn expect_array(value: Value, what: &str) -> GeniusResult<Vec<Value>> {
    match value {
        Value::Array(values) => Ok(values),
        other => Err(GeniusError::serialization(format!(
            "expected {what} to be a JSON array, got {other}"
        ))),
    }
}
