//! Core types shared across the gamereview crates.
//!
//! - [`schema`]: table and column descriptors that make up the identifier whitelist.
//! - [`config`]: the YAML configuration loaded once at process start.

pub mod config;
pub mod schema;

pub use config::{
    CatalogConfig, ConfigError, ConnectionPoolConfig, ConnectionTarget, DatabaseConfig,
    GameReviewConfig, LogFormat, ObservabilityConfig, QueryConfig, ServerConfig, SslMode,
};
pub use schema::{ColumnDescriptor, ColumnKind, TableDescriptor};
