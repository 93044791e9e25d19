/*!
 * Spin Guard Tests
 */

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use synctl::SpinSynchronizer;

#[test]
fn test_spin_guard_mutual_exclusion() {
    let flag = Arc::new(AtomicBool::new(false));
    let inside = Arc::new(AtomicUsize::new(0));
    let counter = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let flag = flag.clone();
            let inside = inside.clone();
            let counter = counter.clone();
            thread::spawn(move || {
                for _ in 0..10_000 {
                    let _guard = SpinSynchronizer::new(Some(&flag));
                    assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                    let current = counter.load(Ordering::Relaxed);
                    counter.store(current + 1, Ordering::Relaxed);
                    inside.fetch_sub(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(counter.load(Ordering::Relaxed), 40_000);
    assert!(!flag.load(Ordering::SeqCst));
}

#[test]
fn test_none_flag_guard() {
    let guard = SpinSynchronizer::new(None);
    assert!(!guard.is_held());
}
