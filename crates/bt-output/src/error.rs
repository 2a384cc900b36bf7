//! Error types for bt-output.

use thiserror::Error;

/// Errors raised while persisting or replaying the event log.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("log record {line}: {source}")]
    Replay {
        line:   u64,
        source: bt_core::CoreError,
    },
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
