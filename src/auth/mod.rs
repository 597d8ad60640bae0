//! Authentication module for the Genius client.
//!
//! Project creation authenticates with HTTP Basic credentials; every other
//! call carries the session token as a bearer header.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashMap;

use crate::errors::GeniusError;
use crate::types::credentials::{BasicCredentials, Session};

/// Header the auth providers write to.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Authentication provider trait.
///
/// Implementations write their credentials into request headers.
pub trait AuthProvider: Send + Sync {
    /// Apply authentication to request headers.
    fn apply_auth(&self, headers: &mut HashMap<String, String>);

    /// Get the authentication scheme name.
    fn scheme(&self) -> &str;

    /// Validate the credentials.
    fn validate(&self) -> Result<(), GeniusError>;
}

/// HTTP Basic authentication for the bootstrap exchange.
pub struct BasicAuth<'a> {
    credentials: &'a BasicCredentials,
}

impl<'a> BasicAuth<'a> {
    /// Creates a provider over bootstrap credentials.
    pub fn new(credentials: &'a BasicCredentials) -> Self {
        Self { credentials }
    }
}

impl AuthProvider for BasicAuth<'_> {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        let encoded = STANDARD.encode(format!(
            "{}:{}",
            self.credentials.username(),
            self.credentials.password()
        ));
        headers.insert(AUTHORIZATION_HEADER.to_string(), format!("Basic {encoded}"));
    }

    fn scheme(&self) -> &str {
        "Basic"
    }

    fn validate(&self) -> Result<(), GeniusError> {
        if self.credentials.username().is_empty() {
            return Err(GeniusError::invalid_configuration(
                "username cannot be empty",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for BasicAuth<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.credentials.username())
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Bearer authentication with the current session token.
pub struct BearerAuth<'a> {
    session: &'a Session,
}

impl<'a> BearerAuth<'a> {
    /// Creates a provider over a session.
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }
}

impl AuthProvider for BearerAuth<'_> {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert(
            AUTHORIZATION_HEADER.to_string(),
            format!("Bearer {}", self.session.token()),
        );
    }

    fn scheme(&self) -> &str {
        "Bearer"
    }

    fn validate(&self) -> Result<(), GeniusError> {
        if self.session.token().is_empty() {
            return Err(GeniusError::precondition("session token cannot be empty"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for BearerAuth<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerAuth")
            .field("token", &"[REDACTED]")
            .field("token_hint", &self.session.token_hint())
            .finish()
    }
}
