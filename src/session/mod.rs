//! Durable storage for the session token.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{GeniusError, GeniusResult};
use crate::types::credentials::Session;

/// File name of the persisted session inside the project directory.
pub const SESSION_FILE_NAME: &str = "token.json";

/// Where a client keeps its session between runs.
pub trait SessionStore: Send + Sync {
    /// Persists the session, replacing any previous one.
    fn save(&self, session: &Session) -> GeniusResult<()>;

    /// Loads the persisted session.
    fn load(&self) -> GeniusResult<Session>;
}

/// Stores the session as `token.json` in a project directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Creates a store rooted at `dir`. The directory is created on save.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the session file path.
    pub fn path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE_NAME)
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, session: &Session) -> GeniusResult<()> {
        let path = self.path();

        fs::create_dir_all(&self.dir).map_err(|e| GeniusError::Storage {
            path: self.dir.clone(),
            message: format!("failed to create project directory: {e}"),
        })?;

        let content = serde_json::to_string_pretty(&session.to_json())?;

        fs::write(&path, content).map_err(|e| GeniusError::Storage {
            path: path.clone(),
            message: e.to_string(),
        })?;

        tracing::info!(
            path = %path.display(),
            project = session.project_name(),
            "Saved session"
        );
        Ok(())
    }

    fn load(&self) -> GeniusResult<Session> {
        Session::load(self.path())
    }
}
