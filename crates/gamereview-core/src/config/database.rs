//! Database connection configuration.
//!
//! Three ways to point the backend at Postgres are supported:
//! 1. `database_url_env` - name of an environment variable holding the URL
//! 2. `database_url` - the URL itself
//! 3. Individual fields (host, port, database, username, password), passed
//!    to the driver without going through a URL

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Postgres connection and its pool.
///
/// Precedence when resolving the [`ConnectionTarget`]:
/// 1. Environment variable containing the full connection URL
/// 2. Direct connection URL
/// 3. Individual connection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Environment variable name containing the PostgreSQL connection URL.
    #[serde(default = "default_database_url_env", skip_serializing_if = "Option::is_none")]
    pub database_url_env: Option<String>,

    /// Full PostgreSQL connection URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,

    /// Hostname of the Postgres server.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port of the Postgres server.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database name to connect to.
    #[serde(default = "default_database")]
    pub database: String,

    /// Username for the connection.
    #[serde(default = "default_username")]
    pub username: String,

    /// Password for the connection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable containing the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// SSL mode for the connection.
    #[serde(default)]
    pub ssl_mode: SslMode,

    /// Connection pool configuration.
    #[serde(default)]
    pub pool: ConnectionPoolConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url_env: default_database_url_env(),
            database_url: None,
            host: default_host(),
            port: default_port(),
            database: default_database(),
            username: default_username(),
            password: None,
            password_env: None,
            ssl_mode: SslMode::default(),
            pool: ConnectionPoolConfig::default(),
        }
    }
}

/// SSL mode for database connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SslMode {
    Disable,
    Allow,
    #[default]
    Prefer,
    Require,
    #[serde(rename = "verify-ca")]
    VerifyCa,
    #[serde(rename = "verify-full")]
    VerifyFull,
}

impl SslMode {
    /// The libpq spelling of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Allow => "allow",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
            SslMode::VerifyCa => "verify-ca",
            SslMode::VerifyFull => "verify-full",
        }
    }
}

/// Connection pool configuration.
///
/// Defaults follow the sizing the review site has always run with:
/// one warm connection, at most three, sixty seconds to acquire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionPoolConfig {
    /// Minimum number of connections to maintain.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Timeout in seconds when acquiring a connection.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u32,

    /// How long a connection can remain idle before being closed.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u32,
}

impl Default for ConnectionPoolConfig {
    fn default() -> Self {
        Self {
            min_connections: default_min_connections(),
            max_connections: default_max_connections(),
            acquire_timeout_seconds: default_acquire_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
        }
    }
}

impl ConnectionPoolConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.acquire_timeout_seconds))
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.idle_timeout_seconds))
    }
}

fn default_min_connections() -> u32 {
    1
}

fn default_max_connections() -> u32 {
    3
}

fn default_acquire_timeout() -> u32 {
    60
}

fn default_idle_timeout() -> u32 {
    600
}

/// Where to connect, after applying the precedence rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    /// A complete connection URL, used as given.
    Url(String),
    /// Individual parameters. Values are handed to the driver as-is, so
    /// credentials containing URL metacharacters need no escaping.
    Fields {
        host: String,
        port: u16,
        database: String,
        username: String,
        password: Option<String>,
        ssl_mode: SslMode,
    },
}

impl DatabaseConfig {
    /// Resolve the connection target: env URL, then direct URL, then fields.
    pub fn target(&self) -> ConnectionTarget {
        if let Some(env_var) = &self.database_url_env
            && let Ok(url) = std::env::var(env_var)
        {
            return ConnectionTarget::Url(url);
        }

        if let Some(url) = &self.database_url {
            return ConnectionTarget::Url(url.clone());
        }

        ConnectionTarget::Fields {
            host: self.host.clone(),
            port: self.port,
            database: self.database.clone(),
            username: self.username.clone(),
            password: self.get_password(),
            ssl_mode: self.ssl_mode,
        }
    }

    /// Get the password, checking password_env first.
    fn get_password(&self) -> Option<String> {
        if let Some(env_var) = &self.password_env
            && let Ok(password) = std::env::var(env_var)
        {
            return Some(password);
        }
        self.password.clone()
    }

    /// Connection target with credentials stripped, for log lines.
    pub fn redacted_target(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.database)
    }
}

fn default_database_url_env() -> Option<String> {
    Some("DATABASE_URL".to_string())
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_database() -> String {
    "gamereview".to_string()
}

fn default_username() -> String {
    "postgres".to_string()
}
