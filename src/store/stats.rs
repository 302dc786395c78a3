//! Window statistics

use serde::Serialize;

/// Point-in-time counters of an event window
///
/// Counters are read independently, so under concurrent inserts the
/// values may be slightly out of step with each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WindowStats {
    /// Fixed number of slots
    pub capacity: usize,
    /// Events currently held
    pub occupancy: usize,
    /// Events ever inserted
    pub total_inserted: u64,
    /// Events pushed out by newer inserts
    pub evicted: u64,
}

impl WindowStats {
    /// Fraction of the window in use, from 0.0 to 1.0
    pub fn fill_ratio(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.occupancy as f64 / self.capacity as f64
    }

    pub fn is_full(&self) -> bool {
        self.occupancy >= self.capacity
    }
}
