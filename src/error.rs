//! Common error types for plantbase

use thiserror::Error;

/// Common result type for plantbase operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the ingestion and export pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Source document could not be parsed at all (fatal, store untouched)
    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found (e.g. exporting without a store)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Document violates a structural expectation beyond plain JSON syntax
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Internal invariant violation (e.g. a constraint the normalizer
    /// guarantees by construction)
    #[error("Internal error: {0}")]
    Internal(String),
}
