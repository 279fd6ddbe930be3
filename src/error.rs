//! Error types for geocluster.
//!
//! The clustering engine itself never fails; these errors come from the
//! surfaces around it: query validation, configuration loading, strict
//! geohash parsing and the post store.

use thiserror::Error;
use uuid::Uuid;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClusterError>;

#[derive(Debug, Error)]
pub enum ClusterError {
    /// Caller-supplied coordinates or ranges are unusable
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid geohash: {0}")]
    InvalidGeohash(String),

    #[error("Record not found: {0}")]
    RecordNotFound(Uuid),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(feature = "toml")]
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
