//! Runs in its own test binary so nothing has captured the epoch yet.

use std::sync::{Arc, Barrier};
use std::thread;

use gfxshim_metrics::clock::{self, Timestamp};

#[test]
fn racing_first_callers_share_one_epoch() {
    const THREADS: usize = 16;
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                // Half the threads reach the epoch through a zero start
                if i % 2 == 0 {
                    let since = clock::elapsed_milliseconds(Timestamp::ZERO, Timestamp::ZERO);
                    assert!(since >= 0.0);
                }
                clock::epoch()
            })
        })
        .collect();

    let seen: Vec<Timestamp> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(!seen[0].is_zero());
    assert!(seen.iter().all(|t| *t == seen[0]), "{seen:?}");
    assert_eq!(clock::epoch(), seen[0]);
}
