//! Tests for bt-sim.

use std::collections::VecDeque;

use bt_core::{FixedClock, RandomSource, StateUpdate, Timestamp};
use bt_output::{EventSink, MemorySink, OutputError, OutputResult};

use crate::{SimBuilder, SimConfig, SimEngine};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Random source with scripted draws.  Empty scripts fall back to the low end
/// of the requested range.  Every request is recorded with its arguments.
#[derive(Default)]
struct ScriptedRng {
    deviate: bool,
    offsets: VecDeque<f64>,
    counts:  VecDeque<u32>,

    chances:       Vec<f64>,
    offset_ranges: Vec<(f64, f64)>,
    count_ranges:  Vec<(u32, u32)>,
}

impl ScriptedRng {
    fn quiet() -> Self {
        Self::default()
    }

    fn counts(counts: &[u32]) -> Self {
        Self { counts: counts.iter().copied().collect(), ..Self::default() }
    }
}

impl RandomSource for ScriptedRng {
    fn chance(&mut self, p: f64) -> bool {
        self.chances.push(p);
        self.deviate
    }

    fn uniform_f64(&mut self, lo: f64, hi: f64) -> f64 {
        self.offset_ranges.push((lo, hi));
        self.offsets.pop_front().unwrap_or(lo)
    }

    fn uniform_u32(&mut self, lo: u32, hi: u32) -> u32 {
        self.count_ranges.push((lo, hi));
        self.counts.pop_front().unwrap_or(lo)
    }
}

/// Sink that fails on the `fail_at`-th append (0-based).
struct FailingSink {
    fail_at: u64,
    written: u64,
}

impl EventSink for FailingSink {
    fn append(&mut self, _update: &StateUpdate) -> OutputResult<()> {
        if self.written == self.fail_at {
            return Err(OutputError::Io(std::io::Error::other("disk gone")));
        }
        self.written += 1;
        Ok(())
    }

    fn records_written(&self) -> u64 {
        self.written
    }
}

fn test_config() -> SimConfig {
    SimConfig { tick_interval_ms: 1, ..SimConfig::default() }
}

fn engine_with<R: RandomSource>(rng: R, occupancy: u32, start: usize) -> SimEngine<R, MemorySink, FixedClock> {
    SimBuilder::new(test_config(), rng, MemorySink::new())
        .clock(FixedClock::stepping(Timestamp(1_700_000_000), 1))
        .initial_occupancy(occupancy)
        .start_index(start)
        .build()
        .unwrap()
}

/// Route index of Stop A (the first route sample).
const AT_STOP_A: usize = 0;
/// Half-way between Stop A and Stop B: well outside both geofences.
const MID_SEGMENT: usize = 10;

// ── OccupancyModel ────────────────────────────────────────────────────────────

#[cfg(test)]
mod occupancy_tests {
    use bt_core::{RandomSource, SimRng};

    use crate::OccupancyModel;

    #[test]
    fn clamps_at_both_ends() {
        let mut occ = OccupancyModel::new(40);
        assert_eq!(occ.apply_delta(50, 0), 40);
        assert!(occ.is_full());
        assert_eq!(occ.apply_delta(0, 100), 0);
        assert_eq!(occ.available(), 40);
    }

    #[test]
    fn plain_arithmetic_inside_bounds() {
        let mut occ = OccupancyModel::with_count(40, 10);
        assert_eq!(occ.apply_delta(3, 1), 12);
        assert_eq!(occ.count(), 12);
        assert_eq!(occ.available(), 28);
        assert_eq!(occ.capacity(), 40);
    }

    #[test]
    fn with_count_clamps() {
        assert_eq!(OccupancyModel::with_count(40, 99).count(), 40);
    }

    #[test]
    fn stays_in_bounds_for_random_sequences() {
        let mut rng = SimRng::new(99);
        let mut occ = OccupancyModel::new(40);
        for _ in 0..10_000 {
            let b = rng.uniform_u32(0, 60);
            let a = rng.uniform_u32(0, 60);
            let n = occ.apply_delta(b, a);
            assert!(n <= 40);
            assert_eq!(n + occ.available(), 40);
        }
    }

    #[test]
    fn extreme_values_do_not_overflow() {
        let mut occ = OccupancyModel::with_count(u32::MAX, u32::MAX - 1);
        assert_eq!(occ.apply_delta(u32::MAX, 0), u32::MAX);
        assert_eq!(occ.apply_delta(0, u32::MAX), 0);
    }
}

// ── Dispatch queues ───────────────────────────────────────────────────────────

#[cfg(test)]
mod dispatch_tests {
    use std::thread;

    use crate::dispatch_queue;

    #[test]
    fn fifo_order() {
        let (tx, rx) = dispatch_queue();
        tx.push("U1");
        tx.push("U2");
        tx.push("U3");
        assert_eq!(rx.drain(), ["U1", "U2", "U3"]);
        assert_eq!(rx.try_pop(), None);
    }

    #[test]
    fn try_pop_on_empty_is_none() {
        let (_tx, rx) = dispatch_queue::<u32>();
        assert_eq!(rx.try_pop(), None);
    }

    #[test]
    fn push_after_consumers_dropped_is_silent() {
        let (tx, rx) = dispatch_queue();
        drop(rx);
        tx.push(1);
    }

    #[test]
    fn cloned_subscribers_split_items_without_duplicates() {
        let (tx, rx) = dispatch_queue();
        for i in 0..1_000u32 {
            tx.push(i);
        }
        let workers: Vec<_> = (0..2)
            .map(|_| {
                let rx = rx.clone();
                thread::spawn(move || {
                    let mut got = Vec::new();
                    while let Some(x) = rx.try_pop() {
                        got.push(x);
                    }
                    got
                })
            })
            .collect();
        let mut all: Vec<u32> = workers.into_iter().flat_map(|w| w.join().unwrap()).collect();
        all.sort_unstable();
        assert_eq!(all, (0..1_000).collect::<Vec<_>>());
    }

    #[test]
    fn producer_on_other_thread_preserves_order() {
        let (tx, rx) = dispatch_queue();
        let producer = thread::spawn(move || {
            for i in 0..500u32 {
                tx.push(i);
            }
        });
        producer.join().unwrap();
        let got = rx.drain();
        assert_eq!(got, (0..500).collect::<Vec<_>>());
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use bt_core::SimRng;
    use bt_output::MemorySink;
    use bt_route::{RouteError, Waypoint};

    use super::*;
    use crate::SimError;

    #[test]
    fn builds_with_defaults() {
        let engine = SimBuilder::new(SimConfig::default(), SimRng::new(1), MemorySink::new())
            .build()
            .unwrap();
        assert_eq!(engine.route().len(), 81);
        assert_eq!(engine.cursor(), 0);
        assert_eq!(engine.occupancy().count(), 0);
        assert_eq!(engine.occupancy().capacity(), 40);
    }

    #[test]
    fn single_waypoint_is_route_error() {
        let config = SimConfig {
            waypoints: vec![Waypoint::new("Lonely", 37.0, -122.0)],
            ..SimConfig::default()
        };
        let result = SimBuilder::new(config, SimRng::new(1), MemorySink::new()).build();
        assert!(matches!(
            result,
            Err(SimError::Route(RouteError::TooFewWaypoints { got: 1 }))
        ));
    }

    #[test]
    fn zero_samples_is_route_error() {
        let config = SimConfig { samples_per_segment: 0, ..SimConfig::default() };
        let result = SimBuilder::new(config, SimRng::new(1), MemorySink::new()).build();
        assert!(matches!(result, Err(SimError::Route(RouteError::ZeroSamples))));
    }

    #[test]
    fn bad_scalars_are_config_errors() {
        let bad = [
            SimConfig { capacity: 0, ..SimConfig::default() },
            SimConfig { deviation_probability: 1.5, ..SimConfig::default() },
            SimConfig { deviation_probability: f64::NAN, ..SimConfig::default() },
            SimConfig { proximity_threshold_m: 0.0, ..SimConfig::default() },
            SimConfig { deviation_min_deg: 0.01, deviation_max_deg: 0.001, ..SimConfig::default() },
        ];
        for config in bad {
            let result = SimBuilder::new(config.clone(), SimRng::new(1), MemorySink::new()).build();
            assert!(matches!(result, Err(SimError::Config(_))), "{config:?} accepted");
        }
    }

    #[test]
    fn initial_occupancy_above_capacity_rejected() {
        let result = SimBuilder::new(SimConfig::default(), SimRng::new(1), MemorySink::new())
            .initial_occupancy(41)
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn start_index_outside_route_rejected() {
        let result = SimBuilder::new(SimConfig::default(), SimRng::new(1), MemorySink::new())
            .start_index(81)
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }
}

// ── Single-tick behaviour ─────────────────────────────────────────────────────

#[cfg(test)]
mod tick_tests {
    use bt_core::{Alert, Tick};

    use super::*;

    #[test]
    fn arrival_applies_boarding_and_alighting() {
        let mut engine = engine_with(ScriptedRng::counts(&[3, 1]), 10, AT_STOP_A);
        let update = engine.step().unwrap();
        assert_eq!(update.occupancy, 12);
        assert_eq!(update.stop.as_deref(), Some("Stop A"));
        assert_eq!(update.alert_text(), "Stop Arrived: Stop A");
        assert_eq!(update.position, engine.route().at(AT_STOP_A));
        assert_eq!(engine.occupancy().count(), 12);
    }

    #[test]
    fn full_bus_supersedes_arrival() {
        let mut engine = engine_with(ScriptedRng::counts(&[1, 0]), 39, AT_STOP_A);
        let update = engine.step().unwrap();
        assert_eq!(update.occupancy, 40);
        assert_eq!(update.stop.as_deref(), Some("Stop A"));
        assert_eq!(update.alert, Some(Alert::BusFull));
        assert_eq!(update.alert_text(), "Bus Full!");
    }

    #[test]
    fn full_bus_alerts_even_between_stops() {
        let mut engine = engine_with(ScriptedRng::quiet(), 40, MID_SEGMENT);
        let update = engine.step().unwrap();
        assert_eq!(update.stop, None);
        assert_eq!(update.alert, Some(Alert::BusFull));
    }

    #[test]
    fn deviation_keeps_precedence_over_arrival() {
        let rng = ScriptedRng {
            deviate: true,
            offsets: VecDeque::from([0.00001, 0.00002]),
            counts:  VecDeque::from([2, 0]),
            ..ScriptedRng::default()
        };
        let mut engine = engine_with(rng, 0, AT_STOP_A);
        let base = engine.route().at(AT_STOP_A);
        let update = engine.step().unwrap();
        assert_eq!(update.alert, Some(Alert::RouteDeviation));
        assert_eq!(update.stop.as_deref(), Some("Stop A"), "still inside the geofence");
        assert_eq!(update.occupancy, 2);
        assert_eq!(update.position, base.offset(0.00001, 0.00002));
    }

    #[test]
    fn draws_use_configured_ranges() {
        let rng = ScriptedRng {
            deviate: true,
            offsets: VecDeque::from([0.00001, 0.00002]),
            counts:  VecDeque::from([2, 1]),
            ..ScriptedRng::default()
        };
        let mut engine = engine_with(rng, 5, AT_STOP_A);
        let update = engine.step().unwrap();
        assert_eq!(update.stop.as_deref(), Some("Stop A"));
        assert_eq!(update.occupancy, 6);

        assert_eq!(engine.rng.chances, [0.05]);
        assert_eq!(engine.rng.offset_ranges, [(0.0005, 0.002), (0.0005, 0.002)]);
        assert_eq!(engine.rng.count_ranges, [(0, 5), (0, 3)], "boarding then alighting");
    }

    #[test]
    fn draw_ranges_follow_config_overrides() {
        let config = SimConfig { max_boarding: 9, max_alighting: 2, ..test_config() };
        let mut engine = SimBuilder::new(config, ScriptedRng::quiet(), MemorySink::new())
            .start_index(AT_STOP_A)
            .build()
            .unwrap();
        engine.step().unwrap();
        assert!(engine.rng.offset_ranges.is_empty(), "no offsets without a deviation");
        assert_eq!(engine.rng.count_ranges, [(0, 9), (0, 2)]);
    }

    #[test]
    fn no_passenger_draws_between_stops() {
        let mut engine = engine_with(ScriptedRng::quiet(), 0, MID_SEGMENT);
        engine.step().unwrap();
        assert_eq!(engine.rng.chances.len(), 1);
        assert!(engine.rng.count_ranges.is_empty());
    }

    #[test]
    fn large_deviation_leaves_geofence() {
        let rng = ScriptedRng {
            deviate: true,
            offsets: VecDeque::from([0.002, 0.002]),
            counts:  VecDeque::from([5, 0]),
            ..ScriptedRng::default()
        };
        let mut engine = engine_with(rng, 0, AT_STOP_A);
        let update = engine.step().unwrap();
        assert_eq!(update.alert_text(), "Route Deviation!");
        assert_eq!(update.stop, None);
        assert_eq!(update.occupancy, 0, "no boarding away from a stop");
    }

    #[test]
    fn quiet_tick_between_stops() {
        let mut engine = engine_with(ScriptedRng::counts(&[5, 0]), 7, MID_SEGMENT);
        let alerts = engine.alerts();
        let update = engine.step().unwrap();
        assert_eq!(update.stop_name(), "");
        assert_eq!(update.alert_text(), "");
        assert_eq!(update.occupancy, 7);
        assert_eq!(alerts.try_pop(), None, "no alert event without an alert");
    }

    #[test]
    fn update_and_alert_are_dispatched_and_logged() {
        let mut engine = engine_with(ScriptedRng::counts(&[3, 1]), 10, AT_STOP_A);
        let updates = engine.updates();
        let alerts = engine.alerts();
        let update = engine.step().unwrap();

        assert_eq!(updates.drain(), [update.clone()]);
        let events = alerts.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "Stop Arrived: Stop A");
        assert_eq!(events[0].timestamp, update.timestamp);
        assert_eq!(engine.sink().updates, [update]);
    }

    #[test]
    fn step_advances_cursor_and_tick() {
        let mut engine = engine_with(ScriptedRng::quiet(), 0, MID_SEGMENT);
        let first = engine.step().unwrap();
        assert_eq!(first.tick, Tick(0));
        assert_eq!(engine.cursor(), MID_SEGMENT + 1);
        assert_eq!(engine.tick(), Tick(1));
    }
}

// ── Multi-tick behaviour ──────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use bt_core::{Alert, SimRng, Tick};

    use super::*;

    #[test]
    fn cursor_returns_to_start_after_one_loop() {
        for start in [0, 7, 80] {
            let mut engine = engine_with(ScriptedRng::quiet(), 0, start);
            let len = engine.route().len() as u64;
            engine.run_ticks(len).unwrap();
            assert_eq!(engine.cursor(), start, "start={start}");
            assert_eq!(engine.tick(), Tick(len));
            assert_eq!(engine.occupancy().count(), 0);
        }
    }

    #[test]
    fn positions_follow_route_then_wrap() {
        let mut engine = engine_with(ScriptedRng::quiet(), 0, 79);
        let route = engine.route().clone();
        let got: Vec<_> = (0..3).map(|_| engine.step().unwrap().position).collect();
        assert_eq!(got, [route.at(79), route.at(80), route.at(0)]);
    }

    #[test]
    fn queues_and_sink_agree_in_order() {
        let mut engine = engine_with(SimRng::new(3), 0, 0);
        let updates = engine.updates();
        let alerts = engine.alerts();
        engine.run_ticks(300).unwrap();

        let dispatched = updates.drain();
        assert_eq!(dispatched.len(), 300);
        assert_eq!(dispatched, engine.sink().updates);
        assert!(dispatched.windows(2).all(|w| w[0].tick < w[1].tick));

        let expected_alerts: Vec<String> = dispatched
            .iter()
            .filter_map(|u| u.alert_event())
            .map(|e| e.message)
            .collect();
        let got_alerts: Vec<String> = alerts.drain().into_iter().map(|e| e.message).collect();
        assert_eq!(got_alerts, expected_alerts);
        assert_eq!(engine.stats().alerts(), got_alerts.len() as u64);
    }

    #[test]
    fn occupancy_invariants_over_long_run() {
        let mut engine = engine_with(SimRng::new(11), 0, 0);
        engine.run_ticks(2_000).unwrap();
        for u in &engine.sink().updates {
            assert!(u.occupancy <= 40);
            if u.occupancy >= 40 {
                assert_eq!(u.alert, Some(Alert::BusFull), "tick {}", u.tick);
            }
            if let Some(Alert::StopArrived(name)) = &u.alert {
                assert_eq!(u.stop.as_ref(), Some(name));
            }
        }
        let stats = engine.stats();
        assert_eq!(stats.ticks, 2_000);
        assert!(stats.stop_events > 0);
    }

    #[test]
    fn same_seed_same_run() {
        let mut a = engine_with(SimRng::new(5), 0, 0);
        let mut b = engine_with(SimRng::new(5), 0, 0);
        a.run_ticks(500).unwrap();
        b.run_ticks(500).unwrap();
        assert_eq!(a.sink().updates, b.sink().updates);
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn stats_track_scripted_stop() {
        let mut engine = engine_with(ScriptedRng::counts(&[4, 2]), 5, AT_STOP_A);
        engine.step().unwrap();
        let stats = engine.stats();
        assert_eq!(stats.ticks, 1);
        assert_eq!(stats.stop_events, 1);
        assert_eq!(stats.boarded, 4);
        assert_eq!(stats.alighted, 2);
        assert_eq!(stats.arrivals, 1);
    }
}

// ── Sink failure ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod failure_tests {
    use bt_core::Tick;

    use super::*;
    use crate::SimError;

    #[test]
    fn failed_append_aborts_tick_without_side_effects() {
        let mut engine = SimBuilder::new(
            test_config(),
            ScriptedRng::counts(&[3, 1, 3, 1]),
            FailingSink { fail_at: 1, written: 0 },
        )
        .initial_occupancy(10)
        .build()
        .unwrap();
        let updates = engine.updates();
        let alerts = engine.alerts();

        // Tick 0 at Stop A succeeds.
        engine.step().unwrap();
        assert_eq!(engine.occupancy().count(), 12);
        assert_eq!(updates.drain().len(), 1);
        assert_eq!(alerts.drain().len(), 1);

        // Tick 1 (still inside Stop A's geofence) fails to log.
        let cursor = engine.cursor();
        let result = engine.step();
        assert!(matches!(result, Err(SimError::Sink(OutputError::Io(_)))));
        assert_eq!(engine.cursor(), cursor);
        assert_eq!(engine.tick(), Tick(1));
        assert_eq!(engine.occupancy().count(), 12);
        assert_eq!(engine.stats().ticks, 1);
        assert_eq!(updates.try_pop(), None);
        assert_eq!(alerts.try_pop(), None);
    }

    #[test]
    fn run_ticks_stops_at_first_failure() {
        let mut engine = SimBuilder::new(
            test_config(),
            ScriptedRng::quiet(),
            FailingSink { fail_at: 4, written: 0 },
        )
        .build()
        .unwrap();
        assert!(engine.run_ticks(10).is_err());
        assert_eq!(engine.sink().records_written(), 4);
        assert_eq!(engine.tick(), Tick(4));
    }
}

// ── Threaded run and shutdown ─────────────────────────────────────────────────

#[cfg(test)]
mod runner_tests {
    use std::thread;
    use std::time::{Duration, Instant};

    use bt_core::SimRng;
    use bt_output::{CsvEventLog, read_log};

    use super::*;
    use crate::{SimError, StopSignal, spawn};

    #[test]
    fn wait_returns_immediately_once_stopped() {
        let stop = StopSignal::new();
        assert!(!stop.is_stopped());
        let t0 = Instant::now();
        assert!(!stop.wait_timeout(Duration::from_millis(20)));
        assert!(t0.elapsed() >= Duration::from_millis(20));

        stop.request_stop();
        assert!(stop.is_stopped());
        let t1 = Instant::now();
        assert!(stop.wait_timeout(Duration::from_secs(10)));
        assert!(t1.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn stop_from_other_thread_wakes_waiter() {
        let stop = StopSignal::new();
        let remote = stop.clone();
        let waker = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            remote.request_stop();
        });
        let t0 = Instant::now();
        assert!(stop.wait_timeout(Duration::from_secs(10)));
        assert!(t0.elapsed() < Duration::from_secs(5));
        waker.join().unwrap();
    }

    #[test]
    fn run_on_thread_then_stop_and_join() {
        let engine = engine_with(SimRng::new(8), 0, 0);
        let updates = engine.updates();
        let handle = spawn(engine).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut seen = Vec::new();
        while seen.len() < 20 && Instant::now() < deadline {
            seen.extend(updates.drain());
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!handle.is_finished());

        let engine = handle.stop().unwrap();
        seen.extend(updates.drain());

        // Every committed tick was logged and dispatched exactly once.
        let ticks = engine.stats().ticks;
        assert!(ticks >= 20, "only {ticks} ticks");
        assert_eq!(engine.sink().records_written(), ticks);
        assert_eq!(seen.len() as u64, ticks);
        assert_eq!(seen, engine.sink().updates);
    }

    #[test]
    fn sink_failure_surfaces_from_stop() {
        let engine = SimBuilder::new(test_config(), ScriptedRng::quiet(), FailingSink { fail_at: 3, written: 0 })
            .build()
            .unwrap();
        let handle = spawn(engine).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(2));
        }
        assert!(matches!(handle.stop(), Err(SimError::Sink(_))));
    }

    #[test]
    fn csv_log_has_one_row_per_tick() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvEventLog::create_in(dir.path()).unwrap();
        let path = sink.path().to_path_buf();
        let mut engine = SimBuilder::new(test_config(), ScriptedRng::quiet(), sink).build().unwrap();
        engine.run_ticks(81).unwrap();

        let records = read_log(&path).unwrap();
        assert_eq!(records.len(), 81);
        assert_eq!(records[0].stop_name, "Stop A");
        assert_eq!(engine.sink().records_written(), 81);
    }
}
