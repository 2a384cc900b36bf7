//! Fluent builder for constructing a [`SimEngine`].

use bt_core::{Clock, RandomSource, SystemClock, Tick};
use bt_output::EventSink;
use bt_route::RouteBuilder;

use crate::{OccupancyModel, SimConfig, SimEngine, SimError, SimResult, SimStats, dispatch_queue};

/// Fluent builder for [`SimEngine<R, S, C>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — capacity, waypoints, sample density, thresholds, …
/// - `R: RandomSource` — usually [`bt_core::SimRng`] seeded from the config
/// - `S: EventSink` — usually [`bt_output::CsvEventLog`]
///
/// # Optional inputs (have defaults)
///
/// | Method                    | Default              |
/// |---------------------------|----------------------|
/// | `.clock(c)`               | `SystemClock`        |
/// | `.initial_occupancy(n)`   | `0`                  |
/// | `.start_index(i)`         | `0` (first waypoint) |
///
/// # Example
///
/// ```rust,ignore
/// let engine = SimBuilder::new(config, SimRng::new(seed), MemorySink::new())
///     .clock(FixedClock::new(Timestamp(0)))
///     .initial_occupancy(10)
///     .build()?;
/// ```
pub struct SimBuilder<R: RandomSource, S: EventSink, C: Clock = SystemClock> {
    config:    SimConfig,
    rng:       R,
    sink:      S,
    clock:     C,
    occupancy: u32,
    start:     usize,
}

impl<R: RandomSource, S: EventSink> SimBuilder<R, S, SystemClock> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, rng: R, sink: S) -> Self {
        Self {
            config,
            rng,
            sink,
            clock:     SystemClock,
            occupancy: 0,
            start:     0,
        }
    }
}

impl<R: RandomSource, S: EventSink, C: Clock> SimBuilder<R, S, C> {
    /// Replace the wall clock used to timestamp updates.
    pub fn clock<C2: Clock>(self, clock: C2) -> SimBuilder<R, S, C2> {
        SimBuilder {
            config:    self.config,
            rng:       self.rng,
            sink:      self.sink,
            clock,
            occupancy: self.occupancy,
            start:     self.start,
        }
    }

    /// Passengers already on board at tick 0.  Must not exceed capacity.
    pub fn initial_occupancy(mut self, count: u32) -> Self {
        self.occupancy = count;
        self
    }

    /// Route sample the first tick reads.  Must be inside the route.
    pub fn start_index(mut self, index: usize) -> Self {
        self.start = index;
        self
    }

    /// Validate the configuration, interpolate the route, open the dispatch
    /// queues, and return a ready-to-run engine.
    pub fn build(self) -> SimResult<SimEngine<R, S, C>> {
        self.config.validate()?;
        let route = RouteBuilder::new(self.config.samples_per_segment).build(&self.config.waypoints)?;

        if self.occupancy > self.config.capacity {
            return Err(SimError::Config(format!(
                "initial occupancy {} exceeds capacity {}",
                self.occupancy, self.config.capacity
            )));
        }
        if self.start >= route.len() {
            return Err(SimError::Config(format!(
                "start index {} outside route of {} samples",
                self.start,
                route.len()
            )));
        }

        let (update_tx, update_rx) = dispatch_queue();
        let (alert_tx, alert_rx) = dispatch_queue();

        Ok(SimEngine {
            occupancy: OccupancyModel::with_count(self.config.capacity, self.occupancy),
            config:    self.config,
            route,
            cursor:    self.start,
            tick:      Tick::ZERO,
            rng:       self.rng,
            sink:      self.sink,
            clock:     self.clock,
            stats:     SimStats::default(),
            update_tx,
            alert_tx,
            update_rx,
            alert_rx,
        })
    }
}
