//! Flat log record — one per tick.

use serde::{Deserialize, Serialize};

use bt_core::{Alert, CoreResult, GeoPoint, StateUpdate, Tick, Timestamp};

/// One event-log row.  Field order is the column order on disk.
///
/// Absent stop and alert are stored as empty strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp:     String,
    pub lat:           f64,
    pub lon:           f64,
    pub stop_name:     String,
    pub seat_occupied: u32,
    pub alert:         String,
}

impl From<&StateUpdate> for LogRecord {
    fn from(update: &StateUpdate) -> Self {
        Self {
            timestamp:     update.timestamp.to_string(),
            lat:           update.position.lat,
            lon:           update.position.lon,
            stop_name:     update.stop_name().to_owned(),
            seat_occupied: update.occupancy,
            alert:         update.alert_text(),
        }
    }
}

impl LogRecord {
    /// Rebuild the update this row was written from.
    ///
    /// The log does not store ticks, so the caller supplies one (normally the
    /// row index).  Alert text that does not match a known alert is dropped.
    pub fn to_update(&self, tick: Tick) -> CoreResult<StateUpdate> {
        Ok(StateUpdate {
            timestamp: self.timestamp.parse::<Timestamp>()?,
            tick,
            position:  GeoPoint::new(self.lat, self.lon),
            occupancy: self.seat_occupied,
            stop:      (!self.stop_name.is_empty()).then(|| self.stop_name.clone()),
            alert:     Alert::from_text(&self.alert),
        })
    }
}
