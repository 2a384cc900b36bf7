//! Startup configuration.
//!
//! Fixed when the engine is built; there is no reload.  With the `serde`
//! feature the struct can be loaded from a JSON file; every field has a
//! default, so a file only needs the values it changes.

use std::time::Duration;

use bt_route::{DEFAULT_SAMPLES_PER_SEGMENT, Waypoint, default_waypoints};

use crate::{SimError, SimResult};

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Seats on the bus.  Default: 40.
    pub capacity: u32,

    /// Stops in travel order.  At least two are required.
    pub waypoints: Vec<Waypoint>,

    /// Interpolated samples between consecutive waypoints.  Default: 20.
    pub samples_per_segment: usize,

    /// Geofence radius around each stop, metres.  Default: 50.
    pub proximity_threshold_m: f64,

    /// Wait between ticks, milliseconds.  Default: 200.
    pub tick_interval_ms: u64,

    /// Per-tick probability of a route deviation, in `[0, 1]`.  Default: 0.05.
    pub deviation_probability: f64,

    /// Lower bound of the per-axis deviation offset, degrees.
    pub deviation_min_deg: f64,

    /// Upper bound of the per-axis deviation offset, degrees.
    pub deviation_max_deg: f64,

    /// Boarding at a stop is drawn uniformly from `0..=max_boarding`.
    pub max_boarding: u32,

    /// Alighting at a stop is drawn uniformly from `0..=max_alighting`.
    pub max_alighting: u32,

    /// Master RNG seed.  The same seed replays the same run.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            capacity:              40,
            waypoints:             default_waypoints(),
            samples_per_segment:   DEFAULT_SAMPLES_PER_SEGMENT,
            proximity_threshold_m: 50.0,
            tick_interval_ms:      200,
            deviation_probability: 0.05,
            deviation_min_deg:     0.0005,
            deviation_max_deg:     0.002,
            max_boarding:          5,
            max_alighting:         3,
            seed:                  42,
        }
    }
}

impl SimConfig {
    #[inline]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Check scalar parameters.  Waypoints and sample density are checked by
    /// the route builder.
    pub fn validate(&self) -> SimResult<()> {
        if self.capacity == 0 {
            return Err(SimError::Config("capacity must be at least 1".into()));
        }
        if !(self.proximity_threshold_m.is_finite() && self.proximity_threshold_m > 0.0) {
            return Err(SimError::Config(format!(
                "proximity threshold must be a positive distance, got {}",
                self.proximity_threshold_m
            )));
        }
        if !(0.0..=1.0).contains(&self.deviation_probability) {
            return Err(SimError::Config(format!(
                "deviation probability must be in [0, 1], got {}",
                self.deviation_probability
            )));
        }
        let (lo, hi) = (self.deviation_min_deg, self.deviation_max_deg);
        if !(lo.is_finite() && hi.is_finite() && 0.0 <= lo && lo <= hi) {
            return Err(SimError::Config(format!(
                "deviation range must satisfy 0 <= min <= max, got [{lo}, {hi}]"
            )));
        }
        Ok(())
    }
}
