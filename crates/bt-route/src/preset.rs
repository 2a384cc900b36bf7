//! Built-in demonstration route.
//!
//! Five stops a few hundred metres apart along a straight corridor in
//! San Francisco.  With 20 samples per segment consecutive samples sit
//! ~12 m apart, so each stop's 50 m geofence covers several ticks.

use crate::Waypoint;

/// Sample density used with [`default_waypoints`].
pub const DEFAULT_SAMPLES_PER_SEGMENT: usize = 20;

/// The five-stop demonstration route, in travel order.
pub fn default_waypoints() -> Vec<Waypoint> {
    vec![
        Waypoint::new("Stop A", 37.7749, -122.4194),
        Waypoint::new("Stop B", 37.7760, -122.4170),
        Waypoint::new("Stop C", 37.7770, -122.4150),
        Waypoint::new("Stop D", 37.7780, -122.4130),
        Waypoint::new("Stop E", 37.7790, -122.4110),
    ]
}
