//! Client configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable overriding the rules engine URL.
pub const SERVER_URL_ENV: &str = "XIANGQI_SERVER_URL";

/// Configuration for the terminal client.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the rules engine.
    #[serde(default = "default_server_url")]
    server_url: String,

    /// Per-request timeout in milliseconds; unset means wait indefinitely.
    #[serde(default)]
    request_timeout_ms: Option<u64>,

    /// Delay before the game-over announcement pops up.
    #[serde(default = "default_announce_delay_ms")]
    announce_delay_ms: u64,

    /// File receiving log output while the terminal UI runs.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,
}

fn default_server_url() -> String {
    "http://localhost:8089".to_string()
}

fn default_announce_delay_ms() -> u64 {
    100
}

fn default_log_file() -> PathBuf {
    PathBuf::from("xiangqi_client.log")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            request_timeout_ms: None,
            announce_delay_ms: default_announce_delay_ms(),
            log_file: default_log_file(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        info!(server_url = %config.server_url, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Resolves configuration: the file when given, defaults otherwise, then
    /// the [`SERVER_URL_ENV`] override.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(match std::env::var(SERVER_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => {
                debug!(server_url = %url, "Server URL overridden from environment");
                config.with_server_url(url)
            }
            _ => config,
        })
    }

    /// Replaces the server URL.
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    /// Request timeout, when configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Game-over announcement delay.
    pub fn announce_delay(&self) -> Duration {
        Duration::from_millis(self.announce_delay_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
