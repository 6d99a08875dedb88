//! Configuration module for filecat.
//!
//! Typed configuration structs mapping the YAML configuration file shared by
//! the `filecatd` daemon and the `filecat` client, with loading, validation,
//! defaults, and a builder for programmatic use.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for filecat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub logging: LoggingConfig,
}

/// Catalog service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the HTTP listener binds to, e.g. `0.0.0.0:5000`.
    pub listen: String,
    /// Path of the SQLite catalog database.
    pub database: PathBuf,
}

/// Sync client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the catalog service.
    pub endpoint: String,
    /// Number of records submitted per upsert request.
    pub batch_size: usize,
    /// Host name reported for this machine. `None` uses the system host name.
    pub host: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/filecat/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("filecat")
            .join("config.yaml")
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for ServerConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("filecat");
        Self {
            listen: "0.0.0.0:5000".to_string(),
            database: data_dir.join("catalog.db"),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000".to_string(),
            batch_size: 10,
            host: None,
            timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"client.batch_size"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- server ---
        if self.server.listen.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError {
                field: "server.listen".into(),
                message: format!("not a socket address: {:?}", self.server.listen),
            });
        }
        if self.server.database.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "server.database".into(),
                message: "must not be empty".into(),
            });
        }

        // --- client ---
        let endpoint = self.client.endpoint.as_str();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            errors.push(ValidationError {
                field: "client.endpoint".into(),
                message: format!("must be an http(s) URL, got {endpoint:?}"),
            });
        }
        if self.client.batch_size == 0 {
            errors.push(ValidationError {
                field: "client.batch_size".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.client.timeout_secs == 0 {
            errors.push(ValidationError {
                field: "client.timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }
        if let Some(host) = &self.client.host {
            if host.trim().is_empty() {
                errors.push(ValidationError {
                    field: "client.host".into(),
                    message: "must not be blank when set".into(),
                });
            }
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level {:?}, expected one of: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for [`Config`], starting from defaults.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a builder pre-populated with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- server ---

    pub fn server_listen(mut self, listen: impl Into<String>) -> Self {
        self.config.server.listen = listen.into();
        self
    }

    pub fn server_database(mut self, database: PathBuf) -> Self {
        self.config.server.database = database;
        self
    }

    // --- client ---

    pub fn client_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.client.endpoint = endpoint.into();
        self
    }

    pub fn client_batch_size(mut self, batch_size: usize) -> Self {
        self.config.client.batch_size = batch_size;
        self
    }

    pub fn client_host(mut self, host: impl Into<String>) -> Self {
        self.config.client.host = Some(host.into());
        self
    }

    pub fn client_timeout_secs(mut self, seconds: u64) -> Self {
        self.config.client.timeout_secs = seconds;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Start from a loaded configuration, e.g. to apply command-line overrides.
impl From<Config> for ConfigBuilder {
    fn from(config: Config) -> Self {
        Self { config }
    }
}
