//! Error types for kvsql
//!
//! Provides a unified error type for all store operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for kvsql operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("Store for table '{table}' is not open")]
    NotOpen { table: String },

    #[error("Storage unavailable at {}: {reason}", .path.display())]
    StorageUnavailable { path: PathBuf, reason: String },

    // -------------------------------------------------------------------------
    // Execution Errors
    // -------------------------------------------------------------------------
    #[error("Statement failed: {0}")]
    Execution(#[from] rusqlite::Error),

    #[error("Transaction task failed: {0}")]
    TaskFailed(String),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Error raised by a key or value serializer/deserializer
///
/// Wraps whatever the codec function reported. Any message or error type
/// convertible into a boxed error can be turned into a `CodecError`.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct CodecError(Box<dyn std::error::Error + Send + Sync>);

impl CodecError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err)
    }
}

impl From<&str> for CodecError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for CodecError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl KvError {
    /// True when the failure came from a closed or never-initialized handle
    pub fn is_not_open(&self) -> bool {
        matches!(self, KvError::NotOpen { .. })
    }
}
