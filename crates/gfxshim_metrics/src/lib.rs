//! GfxShim Metrics - Timing for cross-API performance measurement
//!
//! The [`clock`] module is always available: it provides monotonic
//! timestamps, the calibrated tick period and elapsed-time conversion.
//!
//! Performance statistics are zero-cost abstractions that completely vanish
//! in production builds via feature flags.
//!
//! # Feature Flags
//!
//! - `metrics` - Enable performance statistics collection (default: disabled)
//!
//! # Usage
//!
//! ```ignore
//! use gfxshim_metrics::{clock, PerformanceStatistics};
//!
//! let mut stats = PerformanceStatistics::new();
//! let start = clock::now();
//! // ... do work ...
//! stats.track("queue_submit", start);
//! println!("since launch: {:.3} ms", clock::elapsed_milliseconds(clock::Timestamp::ZERO, clock::Timestamp::ZERO));
//! ```

pub mod clock;

#[cfg(feature = "metrics")]
mod statistics;
#[cfg(feature = "metrics")]
mod tracker;

pub use clock::Timestamp;

#[cfg(feature = "metrics")]
pub use statistics::PerformanceStatistics;
#[cfg(feature = "metrics")]
pub use tracker::PerformanceTracker;

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PerformanceTracker;

#[cfg(not(feature = "metrics"))]
impl PerformanceTracker {
    pub fn new() -> Self { Self }
    pub fn record_since(&mut self, _start: Timestamp) -> f64 { 0.0 }
    pub fn record_ms(&mut self, _ms: f64) {}
    pub fn count(&self) -> u64 { 0 }
    pub fn average_ms(&self) -> f64 { 0.0 }
    pub fn minimum_ms(&self) -> f64 { 0.0 }
    pub fn maximum_ms(&self) -> f64 { 0.0 }
    pub fn reset(&mut self) {}
}

#[cfg(not(feature = "metrics"))]
#[derive(Default)]
pub struct PerformanceStatistics;

#[cfg(not(feature = "metrics"))]
impl PerformanceStatistics {
    pub fn new() -> Self { Self }
    pub fn track(&mut self, _name: &str, _start: Timestamp) -> f64 { 0.0 }
    pub fn get(&self, _name: &str) -> Option<&PerformanceTracker> { None }
    pub fn reset_all(&mut self) {}
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PerformanceTracker)> { std::iter::empty() }
}
