//! Configuration module for the Genius client.
//!
//! Holds the service endpoint, the directory the session file is written
//! to, and transport settings. Credentials are not configuration; they live
//! in [`crate::types::credentials`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{GeniusError, GeniusResult};

/// Default base URL for the Genius API.
pub const DEFAULT_BASE_URL: &str = "https://app.productgenius.io";

/// Default directory for the persisted session.
pub const DEFAULT_PROJECT_DIR: &str = "genius_project";

/// Default request timeout (60 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the Genius client.
#[derive(Debug, Clone)]
pub struct GeniusConfig {
    /// Base URL for API requests.
    pub base_url: String,
    /// Directory where `token.json` is written.
    pub project_dir: PathBuf,
    /// Request timeout.
    pub timeout: Duration,
    /// Custom headers to include in requests.
    pub custom_headers: Vec<(String, String)>,
}

impl GeniusConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> GeniusConfigBuilder {
        GeniusConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `GENIUS_BASE_URL` (optional): Custom base URL
    /// - `GENIUS_PROJECT_DIR` (optional): Directory for the session file
    /// - `GENIUS_TIMEOUT` (optional): Request timeout in seconds
    pub fn from_env() -> GeniusResult<Self> {
        let mut builder = GeniusConfigBuilder::new();

        if let Ok(base_url) = std::env::var("GENIUS_BASE_URL") {
            builder = builder.base_url(base_url);
        }

        if let Ok(project_dir) = std::env::var("GENIUS_PROJECT_DIR") {
            builder = builder.project_dir(project_dir);
        }

        if let Ok(timeout_str) = std::env::var("GENIUS_TIMEOUT") {
            let secs = timeout_str.parse::<u64>().map_err(|_| {
                GeniusError::invalid_configuration(format!(
                    "GENIUS_TIMEOUT must be a number of seconds, got '{timeout_str}'"
                ))
            })?;
            builder = builder.timeout_secs(secs);
        }

        builder.build()
    }
}

impl Default for GeniusConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            project_dir: PathBuf::from(DEFAULT_PROJECT_DIR),
            timeout: DEFAULT_TIMEOUT,
            custom_headers: Vec::new(),
        }
    }
}

/// Builder for `GeniusConfig`.
#[derive(Debug, Default)]
pub struct GeniusConfigBuilder {
    base_url: Option<String>,
    project_dir: Option<PathBuf>,
    timeout: Option<Duration>,
    custom_headers: Vec<(String, String)>,
}

impl GeniusConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration.
    pub fn from_config(config: GeniusConfig) -> Self {
        Self {
            base_url: Some(config.base_url),
            project_dir: Some(config.project_dir),
            timeout: Some(config.timeout),
            custom_headers: config.custom_headers,
        }
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the directory the session file is written to.
    pub fn project_dir(mut self, project_dir: impl AsRef<Path>) -> Self {
        self.project_dir = Some(project_dir.as_ref().to_path_buf());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }

    /// Adds a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> GeniusResult<GeniusConfig> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let parsed = url::Url::parse(&base_url)?;
        let loopback = matches!(
            parsed.host_str(),
            Some("localhost" | "127.0.0.1" | "[::1]")
        );
        if parsed.scheme() != "https" && !(parsed.scheme() == "http" && loopback) {
            return Err(GeniusError::invalid_configuration(
                "Base URL must use HTTPS",
            ));
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(GeniusError::invalid_configuration(
                "Timeout must be greater than zero",
            ));
        }

        Ok(GeniusConfig {
            base_url,
            project_dir: self
                .project_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT_DIR)),
            timeout,
            custom_headers: self.custom_headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, PoisonError};

    const ENV_VARS: [&str; 3] = ["GENIUS_BASE_URL", "GENIUS_PROJECT_DIR", "GENIUS_TIMEOUT"];

    // Tests touching the process environment run one at a time.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        for name in ENV_VARS {
            std::env::remove_var(name);
        }
        for (name, value) in vars {
            std::env::set_var(name, value);
        }
        let result = f();
        for name in ENV_VARS {
            std::env::remove_var(name);
        }
        result
    }

    #[test]
    fn test_from_env_defaults() {
        let config = with_env(&[], GeniusConfig::from_env).unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.project_dir, PathBuf::from(DEFAULT_PROJECT_DIR));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_from_env_overrides() {
        let config = with_env(
            &[
                ("GENIUS_BASE_URL", "https://staging.productgenius.io/"),
                ("GENIUS_PROJECT_DIR", "/tmp/genius_env"),
                ("GENIUS_TIMEOUT", "5"),
            ],
            GeniusConfig::from_env,
        )
        .unwrap();

        assert_eq!(config.base_url, "https://staging.productgenius.io");
        assert_eq!(config.project_dir, PathBuf::from("/tmp/genius_env"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_env_rejects_invalid_timeout() {
        let result = with_env(&[("GENIUS_TIMEOUT", "soon")], GeniusConfig::from_env);

        match result {
            Err(GeniusError::InvalidConfiguration { message }) => {
                assert!(message.contains("GENIUS_TIMEOUT"));
                assert!(message.contains("soon"));
            }
            other => panic!("Expected InvalidConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn test_from_env_rejects_plain_http_base_url() {
        let result = with_env(
            &[("GENIUS_BASE_URL", "http://app.productgenius.io")],
            GeniusConfig::from_env,
        );
        assert!(matches!(
            result,
            Err(GeniusError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_config_builder_defaults() {
        let config = GeniusConfig::builder().build().unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.project_dir, PathBuf::from(DEFAULT_PROJECT_DIR));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.custom_headers.is_empty());
    }

    #[test]
    fn test_config_builder_success() {
        let config = GeniusConfig::builder()
            .base_url("https://staging.productgenius.io/")
            .project_dir("/tmp/genius")
            .timeout(Duration::from_secs(5))
            .header("X-Client", "tests")
            .build()
            .unwrap();

        assert_eq!(config.base_url, "https://staging.productgenius.io");
        assert_eq!(config.project_dir, PathBuf::from("/tmp/genius"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(
            config.custom_headers,
            vec![("X-Client".to_string(), "tests".to_string())]
        );
    }

    #[test]
    fn test_config_builder_rejects_plain_http() {
        let result = GeniusConfig::builder()
            .base_url("http://app.productgenius.io")
            .build();
        assert!(matches!(
            result,
            Err(GeniusError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_config_builder_allows_plain_http_on_loopback() {
        let config = GeniusConfig::builder()
            .base_url("http://127.0.0.1:8080")
            .build()
            .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_config_builder_rejects_garbage_url() {
        let result = GeniusConfig::builder().base_url("not a url").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_builder_rejects_zero_timeout() {
        let result = GeniusConfig::builder().timeout_secs(0).build();
        assert!(result.is_err());
    }
}
