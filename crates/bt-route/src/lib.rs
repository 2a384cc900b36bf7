//! `bt-route` — waypoints and the interpolated loop route.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`waypoint`] | `Waypoint`, `find_stop` geofence lookup                  |
//! | [`path`]     | `RoutePath` (cyclic sample sequence), `RouteBuilder`     |
//! | [`preset`]   | `default_waypoints` — the five-stop demonstration route  |
//! | [`error`]    | `RouteError`, `RouteResult<T>`                           |
//!
//! # Distance semantics
//!
//! Route *generation* interpolates linearly in degree space; stop
//! *detection* ([`find_stop`]) uses haversine distance.  The two are kept
//! deliberately different: the route only needs to look right at
//! sub-kilometre scale, while the geofence radius is specified in metres.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Waypoint`.             |

pub mod error;
pub mod path;
pub mod preset;
pub mod waypoint;


pub use error::{RouteError, RouteResult};
pub use path::{RouteBuilder, RoutePath};
pub use preset::{DEFAULT_SAMPLES_PER_SEGMENT, default_waypoints};
pub use waypoint::{Waypoint, find_stop};
