use bt_output::OutputError;
use bt_route::RouteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("invalid route: {0}")]
    Route(#[from] RouteError),

    #[error("event log write failed: {0}")]
    Sink(#[from] OutputError),

    #[error("could not start simulation thread: {0}")]
    Spawn(std::io::Error),

    #[error("simulation thread panicked")]
    Panicked,
}

pub type SimResult<T> = Result<T, SimError>;
