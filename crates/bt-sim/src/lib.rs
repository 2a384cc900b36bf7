//! `bt-sim` — tick loop and update distribution for the bus_track simulator.
//!
//! # Tick
//!
//! ```text
//! loop until stop requested:
//!   ① Sample     — candidate = route[cursor]
//!   ② Deviation  — with p_dev, perturb candidate; alert = RouteDeviation
//!   ③ Stops      — first waypoint within radius (haversine); if no alert yet,
//!                  alert = StopArrived(name); draw boarding/alighting and
//!                  apply to occupancy (clamped)
//!   ④ Capacity   — occupancy ≥ capacity → alert = BusFull (overrides)
//!   ⑤ Emit       — sink.append(update)?; push update; push alert event
//!   ⑥ Commit     — occupancy, cursor = (cursor + 1) mod len, tick += 1
//!   ⑦ Wait       — tick interval, returning early if stop was requested
//! ```
//!
//! A tick is atomic: if the sink append fails, no simulation state is
//! committed (occupancy, cursor, tick, stats) and nothing is dispatched.  The
//! random draws and clock read of the failed tick are already spent.  The
//! error ends the run.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use bt_core::SimRng;
//! use bt_output::CsvEventLog;
//! use bt_sim::{SimBuilder, SimConfig};
//!
//! let config = SimConfig::default();
//! let sink = CsvEventLog::create_in(Path::new("."))?;
//! let engine = SimBuilder::new(config.clone(), SimRng::new(config.seed), sink).build()?;
//! let updates = engine.updates();
//! let alerts = engine.alerts();
//! let handle = bt_sim::spawn(engine)?;
//! // … poll `updates` / `alerts` …
//! let engine = handle.stop()?;
//! ```

pub mod builder;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod occupancy;
pub mod runner;
pub mod stats;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use config::SimConfig;
pub use dispatch::{Publisher, Subscriber, dispatch_queue};
pub use engine::SimEngine;
pub use error::{SimError, SimResult};
pub use occupancy::OccupancyModel;
pub use runner::{SimHandle, StopSignal, spawn};
pub use stats::SimStats;
