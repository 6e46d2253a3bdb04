//! Crate-level error types.
//!
//! [`StockmeterError`] unifies every error source (configuration, HTTP,
//! JSON, payload shape) behind a single enum so callers can match on the
//! variant they care about while still using the `?` operator for easy
//! propagation.

use crate::schema::SchemaViolation;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StockmeterError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum StockmeterError {
    /// An environment variable held a value that could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The HTTP request could not be built, sent, or completed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status code.
    #[error("backend returned status {status}")]
    Status { status: u16 },

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A stock payload parsed as JSON but did not have the expected shape.
    #[error("invalid payload: {0}")]
    Schema(#[from] SchemaViolation),
}
