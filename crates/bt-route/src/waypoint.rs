//! Named reference coordinates and the geofence lookup.

use bt_core::GeoPoint;

/// A named stop the route passes through.  Order in a waypoint list defines
/// the direction of travel.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    pub name:       String,
    pub coordinate: GeoPoint,
}

impl Waypoint {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self { name: name.into(), coordinate: GeoPoint::new(lat, lon) }
    }
}

/// First waypoint, in listed order, whose haversine distance to `position` is
/// strictly below `radius_m`.
///
/// Scanning stops at the first match, so when two geofences overlap the
/// earlier-listed stop wins.
pub fn find_stop<'a>(waypoints: &'a [Waypoint], position: GeoPoint, radius_m: f64) -> Option<&'a Waypoint> {
    waypoints
        .iter()
        .find(|wp| position.distance_m(wp.coordinate) < radius_m)
}
