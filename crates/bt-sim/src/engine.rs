//! The `SimEngine` struct and its tick loop.

use log::{debug, error, info, warn};

use bt_core::{Alert, AlertEvent, Clock, RandomSource, StateUpdate, SystemClock, Tick};
use bt_output::EventSink;
use bt_route::{RoutePath, find_stop};

use crate::{OccupancyModel, Publisher, SimConfig, SimResult, SimStats, StopSignal, Subscriber};

/// The single-bus simulation.
///
/// Owns the route cursor, the occupancy count, the random source, the event
/// sink, and the producer halves of both dispatch queues.  Nothing else
/// mutates this state: the engine runs on one thread and consumers only see
/// the values it pushes.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct SimEngine<R: RandomSource, S: EventSink, C: Clock = SystemClock> {
    pub(crate) config:    SimConfig,
    pub(crate) route:     RoutePath,
    pub(crate) cursor:    usize,
    pub(crate) tick:      Tick,
    pub(crate) occupancy: OccupancyModel,
    pub(crate) rng:       R,
    pub(crate) sink:      S,
    pub(crate) clock:     C,
    pub(crate) stats:     SimStats,

    pub(crate) update_tx: Publisher<StateUpdate>,
    pub(crate) alert_tx:  Publisher<AlertEvent>,
    pub(crate) update_rx: Subscriber<StateUpdate>,
    pub(crate) alert_rx:  Subscriber<AlertEvent>,
}

impl<R: RandomSource, S: EventSink, C: Clock> SimEngine<R, S, C> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run until `stop` is requested, waiting `config.tick_interval()`
    /// between ticks.
    ///
    /// The stop signal is checked at tick boundaries only; a tick that has
    /// started always finishes.  Returns the first sink error, after which
    /// the engine must not be resumed.
    pub fn run(&mut self, stop: &StopSignal) -> SimResult<()> {
        info!(
            "simulation started: {} route samples, {} stops, capacity {}",
            self.route.len(),
            self.config.waypoints.len(),
            self.config.capacity
        );
        let interval = self.config.tick_interval();
        while !stop.is_stopped() {
            self.step()?;
            if stop.wait_timeout(interval) {
                break;
            }
        }
        info!("simulation stopped at {}: {}", self.tick, self.stats);
        Ok(())
    }

    /// Run exactly `n` ticks back to back, without waiting between them.
    ///
    /// Useful for tests and offline log generation.
    pub fn run_ticks(&mut self, n: u64) -> SimResult<()> {
        for _ in 0..n {
            self.step()?;
        }
        Ok(())
    }

    /// Execute one tick and return the update it emitted.
    pub fn step(&mut self) -> SimResult<StateUpdate> {
        let tick = self.tick;
        let mut position = self.route.at(self.cursor);
        let mut alert = None;

        // ── Deviation ─────────────────────────────────────────────────────
        if self.rng.chance(self.config.deviation_probability) {
            let (lo, hi) = (self.config.deviation_min_deg, self.config.deviation_max_deg);
            let d_lat = self.rng.uniform_f64(lo, hi);
            let d_lon = self.rng.uniform_f64(lo, hi);
            position = position.offset(d_lat, d_lon);
            alert = Some(Alert::RouteDeviation);
            warn!("{tick}: route deviation, reported position {position}");
        }

        // ── Stop proximity, boarding and alighting ───────────────────────
        //
        // Staged on a copy; committed only after the sink accepts the update.
        let mut occupancy = self.occupancy;
        let mut movement = None;
        let stop = find_stop(&self.config.waypoints, position, self.config.proximity_threshold_m)
            .map(|wp| wp.name.clone());
        if let Some(name) = &stop {
            if alert.is_none() {
                alert = Some(Alert::StopArrived(name.clone()));
            }
            let boarding = self.rng.uniform_u32(0, self.config.max_boarding);
            let alighting = self.rng.uniform_u32(0, self.config.max_alighting);
            occupancy.apply_delta(boarding, alighting);
            movement = Some((boarding, alighting));
            info!(
                "{name}: boarding {boarding}, alighting {alighting}, occupancy {}/{}",
                occupancy.count(),
                occupancy.capacity()
            );
        }

        // ── Capacity ──────────────────────────────────────────────────────
        if occupancy.is_full() {
            alert = Some(Alert::BusFull);
            warn!("{tick}: bus full ({}/{})", occupancy.count(), occupancy.capacity());
        }

        // ── Emit ──────────────────────────────────────────────────────────
        let update = StateUpdate {
            timestamp: self.clock.now(),
            tick,
            position,
            occupancy: occupancy.count(),
            stop,
            alert,
        };
        if let Err(e) = self.sink.append(&update) {
            error!("{tick}: event log append failed, aborting tick: {e}");
            return Err(e.into());
        }
        self.update_tx.push(update.clone());
        if let Some(event) = update.alert_event() {
            self.alert_tx.push(event);
        }

        // ── Commit ────────────────────────────────────────────────────────
        self.occupancy = occupancy;
        self.stats.ticks += 1;
        if let Some((boarding, alighting)) = movement {
            self.stats.stop_events += 1;
            self.stats.boarded += u64::from(boarding);
            self.stats.alighted += u64::from(alighting);
        }
        if let Some(alert) = &update.alert {
            self.stats.record_alert(alert);
        }
        self.cursor = self.route.next_index(self.cursor);
        self.tick = tick + 1;

        debug!(
            "{tick}: {} occ={} stop={:?} alert={:?}",
            update.position,
            update.occupancy,
            update.stop_name(),
            update.alert_text()
        );
        Ok(update)
    }

    // ── Consumer handles ──────────────────────────────────────────────────

    /// Consumer handle for the visualization queue.  Clones share the queue.
    pub fn updates(&self) -> Subscriber<StateUpdate> {
        self.update_rx.clone()
    }

    /// Consumer handle for the alert queue.  Clones share the queue.
    pub fn alerts(&self) -> Subscriber<AlertEvent> {
        self.alert_rx.clone()
    }

    // ── Read-only state ───────────────────────────────────────────────────

    /// Index of the route sample the next tick will read.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Tick the next step will produce.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn occupancy(&self) -> OccupancyModel {
        self.occupancy
    }

    pub fn route(&self) -> &RoutePath {
        &self.route
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn stats(&self) -> SimStats {
        self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Unwrap the sink (e.g. to inspect an in-memory log after a run).
    pub fn into_sink(self) -> S {
        self.sink
    }
}
