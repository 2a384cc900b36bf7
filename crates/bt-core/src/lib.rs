//! `bt-core` — foundational types for the `bus_track` loop simulator.
//!
//! This crate is a dependency of every other `bt-*` crate.  It has no `bt-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`geo`]     | `GeoPoint`, haversine distance, linear interpolation      |
//! | [`time`]    | `Tick`, `Timestamp`, `Clock`, `SystemClock`, `FixedClock` |
//! | [`rng`]     | `RandomSource` trait, `SimRng`                            |
//! | [`update`]  | `StateUpdate`, `AlertEvent`, `Alert`                      |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to `GeoPoint`.              |

pub mod error;
pub mod geo;
pub mod rng;
pub mod time;
pub mod update;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use rng::{RandomSource, SimRng};
pub use time::{Clock, FixedClock, SystemClock, Tick, Timestamp};
pub use update::{Alert, AlertEvent, StateUpdate};
