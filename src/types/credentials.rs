//! Credential and session value types.
//!
//! A client is either bootstrapping (password credentials plus a project
//! descriptor) or active (a session token). These are the values for both.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Map, Value};
use std::path::Path;

use super::read_json_file;
use crate::errors::{GeniusError, GeniusResult};

/// Username and password used once to create a project.
#[derive(Clone)]
pub struct BasicCredentials {
    username: String,
    password: SecretString,
}

impl BasicCredentials {
    /// Creates credentials from in-memory values.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password.into()),
        }
    }

    /// Loads credentials from a JSON file with `username` and `password`.
    pub fn load(path: impl AsRef<Path>) -> GeniusResult<Self> {
        let path = path.as_ref();
        let object = read_object(path)?;
        let [username, password] = required_fields(&object, path, ["username", "password"])?;
        Ok(Self::new(username, password))
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Metadata for a project that is about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    project_name: String,
    project_summary: String,
    contact_email: String,
}

impl ProjectDescriptor {
    /// Creates a descriptor from in-memory values.
    pub fn new(
        project_name: impl Into<String>,
        project_summary: impl Into<String>,
        contact_email: impl Into<String>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            project_summary: project_summary.into(),
            contact_email: contact_email.into(),
        }
    }

    /// Loads a descriptor from a JSON file.
    ///
    /// The contact address may be stored as `hacker_email` (the upstream
    /// name) or `contact_email`.
    pub fn load(path: impl AsRef<Path>) -> GeniusResult<Self> {
        let path = path.as_ref();
        let mut object = read_object(path)?;
        if !object.contains_key("hacker_email") {
            if let Some(email) = object.remove("contact_email") {
                object.insert("hacker_email".to_string(), email);
            }
        }
        let [project_name, project_summary, contact_email] = required_fields(
            &object,
            path,
            ["project_name", "project_summary", "hacker_email"],
        )?;
        Ok(Self::new(project_name, project_summary, contact_email))
    }

    /// Returns the project name.
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Returns the project summary.
    pub fn project_summary(&self) -> &str {
        &self.project_summary
    }

    /// Returns the contact email.
    pub fn contact_email(&self) -> &str {
        &self.contact_email
    }

    /// Serializes to the project creation payload.
    pub fn to_json(&self) -> Value {
        json!({
            "project_name": self.project_name,
            "project_summary": self.project_summary,
            "hacker_email": self.contact_email,
        })
    }
}

/// A project-scoped bearer token.
#[derive(Clone)]
pub struct Session {
    project_name: String,
    token: SecretString,
}

impl Session {
    /// Creates a session from in-memory values.
    pub fn new(project_name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            token: SecretString::new(token.into()),
        }
    }

    /// Loads a session from a JSON file with `project_name` and `token`.
    pub fn load(path: impl AsRef<Path>) -> GeniusResult<Self> {
        let path = path.as_ref();
        let object = read_object(path)?;
        let [project_name, token] = required_fields(&object, path, ["project_name", "token"])?;
        Ok(Self::new(project_name, token))
    }

    /// Returns the project name.
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Returns the raw token.
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    /// Gets a hint of the token for debugging (last 4 characters).
    pub fn token_hint(&self) -> String {
        let token = self.token.expose_secret();
        match token.char_indices().rev().nth(3) {
            Some((idx, _)) if token.chars().count() > 4 => format!("...{}", &token[idx..]),
            _ => "****".to_string(),
        }
    }

    /// Serializes to the persisted form. The output contains the raw token.
    pub fn to_json(&self) -> Value {
        json!({
            "project_name": self.project_name,
            "token": self.token.expose_secret(),
        })
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("project_name", &self.project_name)
            .field("token", &"[REDACTED]")
            .field("token_hint", &self.token_hint())
            .finish()
    }
}

fn read_object(path: &Path) -> GeniusResult<Map<String, Value>> {
    match read_json_file(path)? {
        Value::Object(object) => Ok(object),
        _ => Err(GeniusError::config_load(path, "expected a JSON object")),
    }
}

/// Extracts non-empty string fields, reporting every missing one at once.
fn required_fields<const N: usize>(
    object: &Map<String, Value>,
    path: &Path,
    fields: [&str; N],
) -> GeniusResult<[String; N]> {
    let missing: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|field| {
            !matches!(object.get(*field), Some(Value::String(s)) if !s.is_empty())
        })
        .collect();

    if !missing.is_empty() {
        let listed = missing
            .iter()
            .map(|f| format!("`{f}`"))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(GeniusError::config_load(
            path,
            format!("required fields missing or empty: {listed}"),
        ));
    }

    Ok(fields.map(|field| {
        object
            .get(field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }))
}
