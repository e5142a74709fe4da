//! Error types for the qn toolkit

use thiserror::Error;

/// qn error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Not implemented
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// A direction handed to the line search with `g·d >= 0`.
    ///
    /// This is a logic fault in the caller (e.g. a broken Hessian-vector
    /// callback), not a recoverable runtime condition.
    #[error("not a descent direction: g·d = {0}")]
    NotDescentDirection(f64),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
