//! Monotonic timestamps for performance measurement.
//!
//! A [`Timestamp`] is a raw tick count from the host's monotonic counter. Only
//! differences between two timestamps taken by the same process mean anything;
//! multiply a difference by [`tick_period_nanoseconds`] to get nanoseconds, or
//! let [`elapsed_milliseconds`] do it.
//!
//! `Timestamp::ZERO` is a sentinel: as an end it means "now", as a start it
//! means the process epoch, captured once on first use.

use std::sync::OnceLock;

/// Opaque tick count. Not comparable across processes, nor with wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    pub const fn from_ticks(ticks: u64) -> Self {
        Self(ticks)
    }

    pub const fn ticks(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

/// Current value of the host's monotonic counter.
pub fn now() -> Timestamp {
    Timestamp(read_ticks())
}

/// Nanoseconds per tick. Queried once and constant for the process lifetime.
pub fn tick_period_nanoseconds() -> f64 {
    static PERIOD: OnceLock<f64> = OnceLock::new();
    *PERIOD.get_or_init(|| {
        let period = query_tick_period();
        tracing::debug!(period_ns = period, "calibrated tick period");
        period
    })
}

/// Process epoch: the first timestamp ever requested through this function.
/// Concurrent first callers all observe the same value.
pub fn epoch() -> Timestamp {
    static EPOCH: OnceLock<Timestamp> = OnceLock::new();
    *EPOCH.get_or_init(now)
}

/// Milliseconds between `start` and `end`.
///
/// A zero `end` is replaced by [`now`]; a zero `start` by [`epoch`]. The result
/// is negative if `end` precedes `start`.
pub fn elapsed_milliseconds(start: Timestamp, end: Timestamp) -> f64 {
    let epoch = epoch();
    let end = if end.is_zero() { now() } else { end };
    let start = if start.is_zero() { epoch } else { start };

    let delta = end.0.wrapping_sub(start.0) as i64;
    delta as f64 * tick_period_nanoseconds() / 1e6
}

/* --------------------- macOS / iOS (Darwin) --------------------- */

#[cfg(any(target_os = "macos", target_os = "ios"))]
#[allow(deprecated)]
fn read_ticks() -> u64 {
    // +1 keeps a reading from ever colliding with the zero sentinel
    unsafe { libc::mach_absolute_time() }.wrapping_add(1)
}

#[cfg(any(target_os = "macos", target_os = "ios"))]
#[allow(deprecated)]
fn query_tick_period() -> f64 {
    let mut timebase = libc::mach_timebase_info { numer: 0, denom: 0 };
    let rc = unsafe { libc::mach_timebase_info(&mut timebase) };
    if rc != 0 || timebase.denom == 0 {
        return 1.0;
    }
    timebase.numer as f64 / timebase.denom as f64
}

/* --------------------- Linux / Android / BSD --------------------- */

#[cfg(all(unix, not(any(target_os = "macos", target_os = "ios"))))]
fn read_ticks() -> u64 {
    let mut ts: libc::timespec = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts) };
    if rc != 0 {
        return fallback_ticks();
    }
    // Nanosecond ticks; +1 keeps a reading from ever colliding with the zero sentinel
    (ts.tv_sec as u64)
        .wrapping_mul(1_000_000_000)
        .wrapping_add(ts.tv_nsec as u64)
        .wrapping_add(1)
}

#[cfg(all(unix, not(any(target_os = "macos", target_os = "ios"))))]
fn query_tick_period() -> f64 { 1.0 }

/* -------------------------- Windows -------------------------- */

#[cfg(target_os = "windows")]
fn read_ticks() -> u64 {
    use windows_sys::Win32::System::Performance::QueryPerformanceCounter;
    let mut count: i64 = 0;
    if unsafe { QueryPerformanceCounter(&mut count) } == 0 {
        return fallback_ticks();
    }
    (count as u64).wrapping_add(1)
}

#[cfg(target_os = "windows")]
fn query_tick_period() -> f64 {
    use windows_sys::Win32::System::Performance::QueryPerformanceFrequency;
    let mut frequency: i64 = 0;
    if unsafe { QueryPerformanceFrequency(&mut frequency) } == 0 || frequency <= 0 {
        return 1.0;
    }
    1e9 / frequency as f64
}

/* --------------------- Other / WASM / Fallbacks --------------------- */

#[cfg(not(any(unix, target_os = "windows")))]
fn read_ticks() -> u64 {
    fallback_ticks()
}

#[cfg(not(any(unix, target_os = "windows")))]
fn query_tick_period() -> f64 { 1.0 }

/// Nanoseconds since the first fallback reading, offset past the zero sentinel.
#[allow(dead_code)]
fn fallback_ticks() -> u64 {
    static ANCHOR: OnceLock<std::time::Instant> = OnceLock::new();
    let anchor = *ANCHOR.get_or_init(std::time::Instant::now);
    anchor.elapsed().as_nanos() as u64 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn same_timestamp_elapses_zero() {
        let t = now();
        assert_eq!(elapsed_milliseconds(t, t), 0.0);
    }

    #[test]
    fn later_sample_is_never_negative() {
        let t1 = now();
        std::thread::sleep(Duration::from_millis(2));
        let t2 = now();

        assert!(t2 >= t1);
        assert!(elapsed_milliseconds(t1, t2) >= 0.0);
        assert!(elapsed_milliseconds(t2, t1) <= 0.0);
    }

    #[test]
    fn sleep_is_measured_in_milliseconds() {
        let start = now();
        std::thread::sleep(Duration::from_millis(20));
        let ms = elapsed_milliseconds(start, Timestamp::ZERO);

        // Generous upper bound for loaded CI machines
        assert!(ms >= 19.0, "measured {ms}ms");
        assert!(ms < 5_000.0, "measured {ms}ms");
    }

    #[test]
    fn zero_start_uses_one_epoch() {
        // Captures the epoch if no other test has yet
        assert!(elapsed_milliseconds(Timestamp::ZERO, Timestamp::ZERO) >= 0.0);

        let reference = now();
        let first = elapsed_milliseconds(Timestamp::ZERO, reference);
        let second = elapsed_milliseconds(Timestamp::ZERO, reference);

        assert_eq!(first, second);
        assert!(first >= 0.0);
        assert_eq!(epoch(), epoch());
    }

    #[test]
    fn tick_period_is_positive_and_stable() {
        let period = tick_period_nanoseconds();
        assert!(period > 0.0);
        assert_eq!(period, tick_period_nanoseconds());
    }

    #[test]
    fn readings_never_hit_the_sentinel() {
        assert!(!now().is_zero());
        assert!(Timestamp::ZERO.is_zero());
        assert_eq!(Timestamp::from_ticks(42).ticks(), 42);
    }
}
