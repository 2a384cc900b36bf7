//! Dense interpolated route and its builder.
//!
//! # Layout
//!
//! For `N` waypoints and `S` samples per segment the path holds
//! `(N − 1)·S + 1` points:
//!
//! ```text
//! segment 0:   A0 + (A1−A0)·k/S      k = 0 .. S−1
//! segment 1:   A1 + (A2−A1)·k/S      k = 0 .. S−1
//! …
//! tail:        A(N−1)                 (exact, not interpolated)
//! ```
//!
//! The engine walks the path with a cursor that wraps to 0 after the tail,
//! so the bus jumps from the last stop straight back to the first one.

use bt_core::GeoPoint;

use crate::{RouteError, RouteResult, Waypoint};

// ── RoutePath ─────────────────────────────────────────────────────────────────

/// Ordered, non-empty sequence of route samples.
///
/// Do not construct directly; use [`RouteBuilder`].
#[derive(Clone, Debug, PartialEq)]
pub struct RoutePath {
    points: Vec<GeoPoint>,
}

impl RoutePath {
    /// Number of samples.  Always ≥ 2 for a built route.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; present for API symmetry with slices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sample at `index`, wrapping modulo the path length.
    #[inline]
    pub fn at(&self, index: usize) -> GeoPoint {
        self.points[index % self.points.len()]
    }

    /// Cursor position following `index` on the loop.
    #[inline]
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.points.len()
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn first(&self) -> GeoPoint {
        self.points[0]
    }

    pub fn last(&self) -> GeoPoint {
        self.points[self.points.len() - 1]
    }

    /// Index of the sample closest to `position` in flat degree space.
    ///
    /// Used by consumers to place a (possibly perturbed) report back onto the
    /// route; cheap enough to run on every poll.
    pub fn nearest_index(&self, position: GeoPoint) -> usize {
        let d2 = |p: &GeoPoint| {
            let dlat = p.lat - position.lat;
            let dlon = p.lon - position.lon;
            dlat * dlat + dlon * dlon
        };
        self.points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| d2(a).total_cmp(&d2(b)))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

// ── RouteBuilder ──────────────────────────────────────────────────────────────

/// Builds a [`RoutePath`] by linear interpolation between consecutive
/// waypoints.
///
/// # Example
///
/// ```rust,ignore
/// let path = RouteBuilder::new(20).build(&default_waypoints())?;
/// assert_eq!(path.len(), 4 * 20 + 1);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct RouteBuilder {
    samples_per_segment: usize,
}

impl RouteBuilder {
    pub fn new(samples_per_segment: usize) -> Self {
        Self { samples_per_segment }
    }

    /// Validate `waypoints` and interpolate the route.
    ///
    /// # Errors
    /// - [`RouteError::TooFewWaypoints`] for fewer than 2 waypoints.
    /// - [`RouteError::ZeroSamples`] when `samples_per_segment` is 0.
    /// - [`RouteError::InvalidCoordinate`] for NaN, infinite, or
    ///   out-of-range coordinates.
    pub fn build(&self, waypoints: &[Waypoint]) -> RouteResult<RoutePath> {
        if waypoints.len() < 2 {
            return Err(RouteError::TooFewWaypoints { got: waypoints.len() });
        }
        let n = self.samples_per_segment;
        if n == 0 {
            return Err(RouteError::ZeroSamples);
        }
        if let Some(bad) = waypoints.iter().find(|wp| !wp.coordinate.is_valid()) {
            return Err(RouteError::InvalidCoordinate {
                name: bad.name.clone(),
                lat:  bad.coordinate.lat,
                lon:  bad.coordinate.lon,
            });
        }

        let mut points = Vec::with_capacity((waypoints.len() - 1) * n + 1);
        for pair in waypoints.windows(2) {
            let (a, b) = (pair[0].coordinate, pair[1].coordinate);
            points.extend((0..n).map(|k| a.lerp(b, k as f64 / n as f64)));
        }
        // Tail is the exact final stop, not an interpolated sample.
        points.push(waypoints[waypoints.len() - 1].coordinate);

        Ok(RoutePath { points })
    }
}
