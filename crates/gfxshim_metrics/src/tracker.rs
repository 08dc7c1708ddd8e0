//! Running duration statistics for one kind of activity

use crate::clock::{elapsed_milliseconds, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceTracker {
    count: u64,
    average_ms: f64,
    minimum_ms: f64,
    maximum_ms: f64,
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self {
            count: 0,
            average_ms: 0.0,
            minimum_ms: 0.0,
            maximum_ms: 0.0,
        }
    }

    /// Records the time from `start` until now and returns it.
    pub fn record_since(&mut self, start: Timestamp) -> f64 {
        let ms = elapsed_milliseconds(start, Timestamp::ZERO);
        self.record_ms(ms);
        ms
    }

    pub fn record_ms(&mut self, ms: f64) {
        if self.count == 0 {
            self.minimum_ms = ms;
            self.maximum_ms = ms;
        } else {
            self.minimum_ms = self.minimum_ms.min(ms);
            self.maximum_ms = self.maximum_ms.max(ms);
        }
        self.count += 1;
        self.average_ms += (ms - self.average_ms) / self.count as f64;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn average_ms(&self) -> f64 {
        self.average_ms
    }

    pub fn minimum_ms(&self) -> f64 {
        self.minimum_ms
    }

    pub fn maximum_ms(&self) -> f64 {
        self.maximum_ms
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for PerformanceTracker {
    fn default() -> Self {
        Self::new()
    }
}
