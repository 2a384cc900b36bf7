//! Passenger count bounded by capacity.

/// Current passenger count, always within `[0, capacity]`.
///
/// `Copy` so the engine can stage a tick's change on a copy and commit it
/// only once the tick has been logged.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OccupancyModel {
    count:    u32,
    capacity: u32,
}

impl OccupancyModel {
    /// Empty bus with the given capacity.
    pub fn new(capacity: u32) -> Self {
        Self { count: 0, capacity }
    }

    /// Bus holding `count` passengers, clamped to `capacity`.
    pub fn with_count(capacity: u32, count: u32) -> Self {
        Self { count: count.min(capacity), capacity }
    }

    /// Apply a stop's boarding and alighting and return the new count.
    ///
    /// The result is `clamp(count + boarding − alighting, 0, capacity)`.
    /// Impossible combinations (more alighting than riders, more boarding
    /// than seats) are absorbed by the clamp rather than reported.
    pub fn apply_delta(&mut self, boarding: u32, alighting: u32) -> u32 {
        let next = i64::from(self.count) + i64::from(boarding) - i64::from(alighting);
        self.count = next.clamp(0, i64::from(self.capacity)) as u32;
        self.count
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Free seats: `capacity − count`.
    #[inline]
    pub fn available(&self) -> u32 {
        self.capacity - self.count
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.count >= self.capacity
    }
}
