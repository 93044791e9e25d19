/*!
 * Scope Guards
 *
 * Guards acquire a lock or waitable object on construction and release it
 * unconditionally when they go out of scope.
 *
 * ## Design Principles
 *
 * 1. **No locking logic**: guards only call the lock/waitable interface
 * 2. **Release once**: each successful acquisition is released exactly once
 * 3. **Mode carried by the guard**: release targets the mode this guard took
 * 4. **Drop never panics**: release failures go to the observer hook
 *
 * ## Guard Types
 *
 * - **Synchronizer**: waitable object (mutex, event)
 * - **ReadSynchronizer / WriteSynchronizer**: blocking rwlock, `None` is a no-op
 * - **TryReadSynchronizer / TryWriteSynchronizer**: timed rwlock, `None` is a no-op
 * - **LockGuard**: strict rwlock guard, `None` is an error
 * - **ReadWriteSynchronizer**: exclusive then shared on one lock
 * - **SpinSynchronizer**: busy-wait on an atomic flag
 *
 * ## Example
 *
 * ```ignore
 * let mutex = Mutex::new()?;
 * {
 *     let _guard = Synchronizer::acquire(&mutex)?;
 *     // critical section
 * } // released here
 * ```
 */

mod combined;
mod lock;
mod observe;
mod rw;
mod spin;
mod synchronizer;
mod traits;

pub use combined::{ReadWriteSynchronizer, Stage};
pub use lock::{ExclusiveLockGuard, LockGuard, SharedLockGuard};
pub use observe::{reset_observer, set_observer, SyncObserver, TracingObserver};
pub use rw::{ReadSynchronizer, TryReadSynchronizer, TryWriteSynchronizer, WriteSynchronizer};
pub use spin::SpinSynchronizer;
pub use synchronizer::Synchronizer;
pub use traits::Guard;

use std::time::Instant;

/// Guard metadata for observability
#[derive(Debug, Clone)]
pub struct GuardMetadata {
    pub resource_type: &'static str,
    pub creation_time: Instant,
}

impl GuardMetadata {
    #[inline]
    pub fn new(resource_type: &'static str) -> Self {
        Self {
            resource_type,
            creation_time: Instant::now(),
        }
    }

    /// Time since the guard was created, in microseconds
    #[inline]
    pub fn lifetime_micros(&self) -> u64 {
        self.creation_time.elapsed().as_micros() as u64
    }
}
