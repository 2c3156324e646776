//! Error types
//!
//! Defines domain-specific error types for the user store and the HTTP layer.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// User store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read user store {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse user store {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode user store: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to write user store {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("User already exists: {0}")]
    DuplicateUsername(String),
}

/// Errors that escape a request handler
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
