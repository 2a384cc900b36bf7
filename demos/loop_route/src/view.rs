//! Text rendering of the bus position and seat occupancy.

use bt_core::StateUpdate;
use bt_route::RoutePath;

/// Renders one status line per update against the precomputed route.
pub struct MapView {
    route:     RoutePath,
    capacity:  u32,
    bar_width: usize,
}

impl MapView {
    pub fn new(route: RoutePath, capacity: u32) -> Self {
        Self { route, capacity, bar_width: 20 }
    }

    pub fn render(&self, update: &StateUpdate) -> String {
        let index = self.route.nearest_index(update.position);
        let stop = update.stop.as_deref().unwrap_or("-");
        format!(
            "{} {} route {:>3}/{} | seats [{}] {:>2} occupied / {:>2} available | stop {}",
            update.timestamp,
            update.position,
            index,
            self.route.len() - 1,
            occupancy_bar(update.occupancy, self.capacity, self.bar_width),
            update.occupancy,
            self.capacity.saturating_sub(update.occupancy),
            stop,
        )
    }
}

/// `#` for occupied, `.` for available, scaled to `width` characters.
pub fn occupancy_bar(occupied: u32, capacity: u32, width: usize) -> String {
    let filled = if capacity == 0 {
        0
    } else {
        (occupied.min(capacity) as usize * width).div_ceil(capacity as usize)
    };
    let mut bar = "#".repeat(filled);
    bar.push_str(&".".repeat(width - filled));
    bar
}
