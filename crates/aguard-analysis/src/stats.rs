use super::constants::{MIN_TRACKED_DB, SMOOTHING_NEW_WEIGHT, SMOOTHING_PREVIOUS_WEIGHT};
use super::types::SessionStats;

/// Rolling loudness statistics for one session.
///
/// `current` is first-order exponentially smoothed; `max`/`min` are session
/// extrema with readings at or below the noise floor excluded from min
/// tracking; `avg` is the running mean over every reading fed in.
pub struct StatsTracker {
    stats: SessionStats,
    sum: u64,
    count: u64,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            stats: SessionStats::default(),
            sum: 0,
            count: 0,
        }
    }

    pub fn update(&mut self, db: u16) -> SessionStats {
        self.sum += db as u64;
        self.count += 1;

        let stats = &mut self.stats;
        stats.current = (stats.current as f32 * SMOOTHING_PREVIOUS_WEIGHT
            + db as f32 * SMOOTHING_NEW_WEIGHT)
            .round() as u16;
        stats.max = stats.max.max(db);
        if db > MIN_TRACKED_DB {
            stats.min = stats.min.min(db);
        }
        stats.avg = (self.sum as f64 / self.count as f64).round() as u16;

        *stats
    }

    /// Back to the session seed. Replaces the whole accumulator in one step
    /// so a snapshot never observes cleared counters with stale extrema.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn snapshot(&self) -> SessionStats {
        self.stats
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}
