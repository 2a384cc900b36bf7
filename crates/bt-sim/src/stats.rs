//! Running totals reported at shutdown.

use std::fmt;

use bt_core::Alert;

/// Counters accumulated over committed ticks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SimStats {
    pub ticks:       u64,
    /// Ticks on which the bus was inside a stop's geofence.
    pub stop_events: u64,
    pub boarded:     u64,
    pub alighted:    u64,
    pub deviations:  u64,
    pub arrivals:    u64,
    pub full_alerts: u64,
}

impl SimStats {
    pub(crate) fn record_alert(&mut self, alert: &Alert) {
        match alert {
            Alert::RouteDeviation => self.deviations += 1,
            Alert::StopArrived(_) => self.arrivals += 1,
            Alert::BusFull => self.full_alerts += 1,
        }
    }

    /// Total alert events emitted.
    pub fn alerts(&self) -> u64 {
        self.deviations + self.arrivals + self.full_alerts
    }
}

impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ticks, {} stop events (+{} / -{} passengers), alerts: {} deviation, {} arrival, {} full",
            self.ticks,
            self.stop_events,
            self.boarded,
            self.alighted,
            self.deviations,
            self.arrivals,
            self.full_alerts,
        )
    }
}
