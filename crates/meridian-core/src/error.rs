//! Error types for Meridian

use thiserror::Error;

/// Core Meridian errors
#[derive(Error, Debug)]
pub enum MeridianError {
    // Zone errors
    #[error("Unsupported zone id: {0}")]
    UnsupportedZoneId(String),

    // Persistence errors
    #[error("Malformed persisted state: {0}")]
    MalformedPersistedState(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // Collaborator errors
    #[error("Lookup failed: {0}")]
    Lookup(String),

    // Runtime errors
    #[error("No async runtime available: {0}")]
    NoRuntime(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for Meridian operations
pub type MeridianResult<T> = Result<T, MeridianError>;
