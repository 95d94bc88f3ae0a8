//! Configuration types for the gamereview backend.
//!
//! Configuration is a single YAML file (`gamereview.yaml`) combined into one
//! [`GameReviewConfig`]. Every section has defaults, so an empty file (or no
//! file at all) yields a server pointed at a local Postgres.
//!
//! # Sections
//!
//! - **database**: connection parameters and pool sizing
//! - **server**: HTTP listener and shutdown grace period
//! - **catalog**: which tables and columns are whitelisted for querying
//! - **query**: row limit and execution timeout for projection queries
//! - **observability**: log filter and output format

pub mod database;
pub mod server;

use crate::schema::TableDescriptor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use database::{ConnectionPoolConfig, ConnectionTarget, DatabaseConfig, SslMode};
pub use server::ServerConfig;

/// Environment variable that points at the configuration file.
pub const CONFIG_PATH_ENV: &str = "GAMEREVIEW_CONFIG";

/// Configuration file used when neither a flag nor the env var is given.
pub const DEFAULT_CONFIG_FILE: &str = "gamereview.yaml";

/// Complete configuration loaded from file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GameReviewConfig {
    /// Postgres connection.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// HTTP listener.
    #[serde(default)]
    pub server: ServerConfig,

    /// Identifier whitelist source.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Projection query limits.
    #[serde(default)]
    pub query: QueryConfig,

    /// Logging.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Where the schema catalog comes from and what it admits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Database schema to introspect.
    #[serde(default = "default_schema")]
    pub schema: String,

    /// When non-empty, only these tables are whitelisted.
    #[serde(default)]
    pub include: Vec<String>,

    /// Tables that are never whitelisted.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Static whitelist. When non-empty, introspection is skipped entirely.
    #[serde(default)]
    pub tables: Vec<TableDescriptor>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            schema: default_schema(),
            include: Vec::new(),
            exclude: Vec::new(),
            tables: Vec::new(),
        }
    }
}

impl CatalogConfig {
    /// Whether an introspected table passes the include/exclude lists.
    pub fn admits(&self, table: &str) -> bool {
        if self.exclude.iter().any(|t| t == table) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|t| t == table)
    }

    /// Whether the catalog is given statically rather than introspected.
    pub fn is_static(&self) -> bool {
        !self.tables.is_empty()
    }
}

/// Limits applied to every projection query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Maximum rows a projection query may return.
    #[serde(default = "default_max_rows")]
    pub max_rows: u64,

    /// Milliseconds before a running statement is abandoned.
    #[serde(default = "default_execute_timeout_ms")]
    pub execute_timeout_ms: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
            execute_timeout_ms: default_execute_timeout_ms(),
        }
    }
}

impl QueryConfig {
    pub fn execute_timeout(&self) -> Duration {
        Duration::from_millis(self.execute_timeout_ms)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            log_format: LogFormat::default(),
        }
    }
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_max_rows() -> u64 {
    1000
}

fn default_execute_timeout_ms() -> u64 {
    5000
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GameReviewConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve and load the configuration file.
    ///
    /// An explicit path or `GAMEREVIEW_CONFIG` must exist. The implicit
    /// `./gamereview.yaml` is optional and falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::from_file(PathBuf::from(path));
        }
        let path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let pool = &self.database.pool;
        if pool.max_connections == 0 {
            return Err(ConfigError::Config(
                "database.pool.max_connections must be at least 1".to_string(),
            ));
        }
        if pool.min_connections > pool.max_connections {
            return Err(ConfigError::Config(format!(
                "database.pool.min_connections ({}) exceeds max_connections ({})",
                pool.min_connections, pool.max_connections
            )));
        }
        if self.query.max_rows == 0 {
            return Err(ConfigError::Config(
                "query.max_rows must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
