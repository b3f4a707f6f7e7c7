//! Error types shared by the Palaro results services

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across palaro-common and its callers
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading the results store or resolving configuration
#[derive(Error, Debug)]
pub enum Error {
    /// Store access failure (connection or query fault)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O failure while reading configuration or opening the store
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration value rejected during resolution
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML config file exists but cannot be parsed
    #[error("Malformed config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Store file is absent
    #[error("Results store not found: {0}")]
    StoreNotFound(PathBuf),

    /// Store is reachable but lacks tables the engine reads
    #[error("Results store is missing tables: {}", .0.join(", "))]
    MissingTables(Vec<String>),
}
