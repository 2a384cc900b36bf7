//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where they need to surface it.

use thiserror::Error;

/// Errors produced by `bt-core` parsing helpers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid timestamp {0:?}: expected YYYY-MM-DD HH:MM:SS")]
    InvalidTimestamp(String),
}

/// Shorthand result type for `bt-core`.
pub type CoreResult<T> = Result<T, CoreError>;
