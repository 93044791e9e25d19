/*!
 * Spin Guard
 *
 * Busy-waits on an atomic flag until it flips from clear to set. No timeout
 * and no yielding, so it is only for critical sections of a few instructions.
 */

use super::observe::notify;
use super::traits::Guard;
use super::GuardMetadata;
use crate::core::sync::LockMode;
use std::sync::atomic::{AtomicBool, Ordering};

/// Scope guard over a test-and-set flag
pub struct SpinSynchronizer<'a> {
    flag: Option<&'a AtomicBool>,
    metadata: GuardMetadata,
}

impl<'a> SpinSynchronizer<'a> {
    /// Spin until `flag` was clear and is now set by this guard
    ///
    /// A `None` flag yields a guard that does nothing.
    pub fn new(flag: Option<&'a AtomicBool>) -> Self {
        if let Some(flag) = flag {
            while flag.swap(true, Ordering::Acquire) {
                // Read-only spin until the holder clears it
                while flag.load(Ordering::Relaxed) {
                    std::hint::spin_loop();
                }
            }
            notify(|o| o.on_acquired("spin", LockMode::Exclusive));
        }

        Self {
            flag,
            metadata: GuardMetadata::new("spin"),
        }
    }

    #[inline]
    pub fn is_held(&self) -> bool {
        self.flag.is_some()
    }
}

impl Guard for SpinSynchronizer<'_> {
    fn resource_type(&self) -> &'static str {
        "spin"
    }

    fn metadata(&self) -> &GuardMetadata {
        &self.metadata
    }

    fn is_held(&self) -> bool {
        self.flag.is_some()
    }
}

impl Drop for SpinSynchronizer<'_> {
    fn drop(&mut self) {
        if let Some(flag) = self.flag.take() {
            flag.store(false, Ordering::Release);
            notify(|o| o.on_released("spin", LockMode::Exclusive));
        }
    }
}

impl std::fmt::Debug for SpinSynchronizer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpinSynchronizer")
            .field("held", &self.flag.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_sets_and_clears_flag() {
        let flag = AtomicBool::new(false);
        {
            let guard = SpinSynchronizer::new(Some(&flag));
            assert!(guard.is_held());
            assert!(flag.load(Ordering::SeqCst));
        }
        assert!(!flag.load(Ordering::SeqCst));
    }

    #[test]
    fn test_none_is_noop() {
        let guard = SpinSynchronizer::new(None);
        assert!(!guard.is_held());
    }

    #[test]
    fn test_waits_for_holder() {
        let flag = Arc::new(AtomicBool::new(true));
        let other = flag.clone();
        let waiter = thread::spawn(move || {
            let _guard = SpinSynchronizer::new(Some(&other));
        });

        thread::sleep(std::time::Duration::from_millis(20));
        assert!(!waiter.is_finished());
        flag.store(false, Ordering::Release);
        waiter.join().unwrap();
        assert!(!flag.load(Ordering::SeqCst));
    }
}
