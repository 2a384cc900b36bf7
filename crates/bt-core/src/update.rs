//! Values emitted by the engine once per tick.
//!
//! A [`StateUpdate`] is produced every tick and goes to the event log and the
//! visualization queue.  An [`AlertEvent`] is produced only when the tick
//! raised an [`Alert`], and goes to the alert queue.  Both are plain values:
//! once emitted they are cloned to each consumer and never mutated.

use std::fmt;

use crate::{GeoPoint, Tick, Timestamp};

// ── Alert ─────────────────────────────────────────────────────────────────────

/// Notable condition raised by a tick.  At most one per tick; when several
/// conditions hold the engine keeps the highest-priority one
/// (`BusFull` > `RouteDeviation` > `StopArrived`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Alert {
    /// The reported position was perturbed off the route.
    RouteDeviation,
    /// The bus is within the geofence of the named stop.
    StopArrived(String),
    /// Occupancy reached capacity.
    BusFull,
}

impl Alert {
    /// Parse the text form written to the event log back into an alert.
    /// Returns `None` for the empty string and for unrecognised text.
    pub fn from_text(text: &str) -> Option<Alert> {
        match text {
            "Route Deviation!" => Some(Alert::RouteDeviation),
            "Bus Full!" => Some(Alert::BusFull),
            _ => text
                .strip_prefix("Stop Arrived: ")
                .map(|name| Alert::StopArrived(name.to_owned())),
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::RouteDeviation => f.write_str("Route Deviation!"),
            Alert::StopArrived(name) => write!(f, "Stop Arrived: {name}"),
            Alert::BusFull => f.write_str("Bus Full!"),
        }
    }
}

// ── StateUpdate ───────────────────────────────────────────────────────────────

/// Per-tick snapshot of the bus.
#[derive(Clone, Debug, PartialEq)]
pub struct StateUpdate {
    pub timestamp: Timestamp,
    /// Engine tick that produced this update.
    pub tick:      Tick,
    /// Reported position (route sample, possibly perturbed).
    pub position:  GeoPoint,
    /// Passenger count after this tick's boarding/alighting.
    pub occupancy: u32,
    /// Name of the stop whose geofence contains `position`, if any.
    pub stop:      Option<String>,
    pub alert:     Option<Alert>,
}

impl StateUpdate {
    /// Stop name, or `""` when no stop matched.
    pub fn stop_name(&self) -> &str {
        self.stop.as_deref().unwrap_or("")
    }

    /// Alert text, or `""` when no alert fired.
    pub fn alert_text(&self) -> String {
        self.alert.as_ref().map(Alert::to_string).unwrap_or_default()
    }

    /// The paired alert event, if this tick raised an alert.
    pub fn alert_event(&self) -> Option<AlertEvent> {
        self.alert.as_ref().map(|alert| AlertEvent {
            timestamp: self.timestamp,
            message:   alert.to_string(),
        })
    }
}

// ── AlertEvent ────────────────────────────────────────────────────────────────

/// Message for the alert board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlertEvent {
    pub timestamp: Timestamp,
    pub message:   String,
}

impl fmt::Display for AlertEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.timestamp, self.message)
    }
}
