//! Named performance trackers

use std::collections::HashMap;

use crate::clock::Timestamp;
use crate::tracker::PerformanceTracker;

pub struct PerformanceStatistics {
    trackers: HashMap<String, PerformanceTracker>,
}

impl PerformanceStatistics {
    pub fn new() -> Self {
        Self {
            trackers: HashMap::new(),
        }
    }

    /// Records the time since `start` under `name`; returns the duration in ms.
    pub fn track(&mut self, name: &str, start: Timestamp) -> f64 {
        self.trackers
            .entry(name.to_string())
            .or_default()
            .record_since(start)
    }

    pub fn get(&self, name: &str) -> Option<&PerformanceTracker> {
        self.trackers.get(name)
    }

    pub fn reset_all(&mut self) {
        self.trackers.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PerformanceTracker)> {
        self.trackers.iter()
    }
}

impl Default for PerformanceStatistics {
    fn default() -> Self {
        Self::new()
    }
}
