//! Route-subsystem error type.

use thiserror::Error;

/// Malformed waypoint configuration.  Detected once at startup.
#[derive(Debug, Error, PartialEq)]
pub enum RouteError {
    #[error("a route needs at least 2 waypoints, got {got}")]
    TooFewWaypoints { got: usize },

    #[error("samples per segment must be at least 1")]
    ZeroSamples,

    #[error("waypoint {name:?} has an invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { name: String, lat: f64, lon: f64 },
}

pub type RouteResult<T> = Result<T, RouteError>;
