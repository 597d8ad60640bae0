//! Mock implementations for testing.
//!
//! Provides a mock transport and an in-memory session store so clients can
//! be exercised without network or filesystem access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::errors::{GeniusError, GeniusResult};
use crate::session::SessionStore;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::types::credentials::Session;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock HTTP transport for testing.
pub struct MockTransport {
    responses: Mutex<Vec<MockResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
    default_response: Mutex<Option<MockResponse>>,
}

/// A recorded request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path.
    pub path: String,
    /// Query parameters.
    pub query: Vec<(String, String)>,
    /// Request body.
    pub body: Option<Vec<u8>>,
    /// Request headers.
    pub headers: HashMap<String, String>,
}

impl RecordedRequest {
    /// Returns the body parsed as JSON.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_slice(body).ok())
    }

    /// Returns the `Authorization` header.
    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .get(crate::auth::AUTHORIZATION_HEADER)
            .map(String::as_str)
    }
}

/// A mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// An HTTP response.
    Http {
        /// HTTP status code.
        status: u16,
        /// Response headers.
        headers: HashMap<String, String>,
        /// Response body.
        body: Vec<u8>,
    },
    /// A transport failure.
    Failure(String),
}

impl MockResponse {
    /// Creates a successful JSON response.
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        MockResponse::Http {
            status: 200,
            headers,
            body,
        }
    }

    /// Creates a successful response without a body.
    pub fn empty() -> Self {
        MockResponse::Http {
            status: 200,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Creates an error response.
    pub fn error(status: u16, message: &str) -> Self {
        let body = serde_json::to_vec(&serde_json::json!({ "detail": message }))
            .unwrap_or_default();

        MockResponse::Http {
            status,
            headers: HashMap::new(),
            body,
        }
    }
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            default_response: Mutex::new(None),
        }
    }

    /// Queues a response.
    pub fn queue(&self, response: MockResponse) {
        lock(&self.responses).push(response);
    }

    /// Queues a JSON response.
    pub fn queue_json<T: serde::Serialize>(&self, value: &T) {
        self.queue(MockResponse::json(value));
    }

    /// Queues an error response.
    pub fn queue_error(&self, status: u16, message: &str) {
        self.queue(MockResponse::error(status, message));
    }

    /// Queues a transport failure.
    pub fn queue_failure(&self, message: &str) {
        self.queue(MockResponse::Failure(message.to_string()));
    }

    /// Sets the response used once the queue is empty.
    pub fn set_default(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    fn next_response(&self) -> MockResponse {
        let mut responses = lock(&self.responses);
        if responses.is_empty() {
            lock(&self.default_response)
                .clone()
                .unwrap_or_else(|| MockResponse::error(500, "No mock response configured"))
        } else {
            responses.remove(0)
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(RecordedRequest {
            method: request.method,
            path: request.path,
            query: request.query,
            body: request.body,
            headers: request.headers,
        });

        match self.next_response() {
            MockResponse::Http {
                status,
                headers,
                body,
            } => Ok(HttpResponse {
                status,
                headers,
                body,
            }),
            MockResponse::Failure(message) => Err(TransportError::Connection { message }),
        }
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("request_count", &self.request_count())
            .finish()
    }
}

/// In-memory session store for testing.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    saved: Mutex<Option<Session>>,
    fail_saves: bool,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose saves always fail.
    pub fn failing() -> Self {
        Self {
            saved: Mutex::new(None),
            fail_saves: true,
        }
    }

    /// Returns the last saved session.
    pub fn saved(&self) -> Option<Session> {
        lock(&self.saved).clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, session: &Session) -> GeniusResult<()> {
        if self.fail_saves {
            return Err(GeniusError::Storage {
                path: PathBuf::from("memory"),
                message: "store configured to fail".to_string(),
            });
        }
        *lock(&self.saved) = Some(session.clone());
        Ok(())
    }

    fn load(&self) -> GeniusResult<Session> {
        self.saved()
            .ok_or_else(|| GeniusError::config_load("memory", "no session saved"))
    }
}
