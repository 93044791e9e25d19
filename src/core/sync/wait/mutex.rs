/*!
 * Mutex Object
 *
 * Thread-owned, recursive waitable mutex with abandonment detection.
 *
 * # Ownership
 *
 * A successful `wait` makes the calling thread the owner; the owner may wait
 * again (recursion depth grows) and must `release` once per wait. A release
 * from any other thread is refused with `WaitOutcome::Failed`.
 *
 * If the owning thread terminates while holding the mutex, the next waiter
 * takes ownership and receives `WaitOutcome::Abandoned`.
 */

use super::traits::{RawStatus, Releasable, Waitable};
use crate::core::errors::{LockErrorKind, SyncError, SyncResult, WaitOutcome};
use crate::core::id::{OwnerRecord, ThreadToken};
use crate::core::limits::ABANDONMENT_CHECK_INTERVAL;
use crate::core::sync::deadline::Deadline;
use crate::core::sync::handle::{handle_table, Handle, HandleKind};
use parking_lot::{Condvar, Mutex as StateLock};
use std::time::{Duration, Instant};
use tracing::{trace, warn};

#[derive(Default)]
struct Ownership {
    owner: Option<OwnerRecord>,
    depth: usize,
}

/// Waitable mutex owned by the thread that acquired it
pub struct Mutex {
    state: StateLock<Ownership>,
    condvar: Condvar,
    handle: Handle,
}

impl Mutex {
    /// Create an unowned mutex
    ///
    /// Fails with `CannotCreateLock` when the handle table is exhausted.
    #[track_caller]
    pub fn new() -> SyncResult<Self> {
        let Some(handle) = handle_table().register(HandleKind::Mutex) else {
            return Err(SyncError::new(
                LockErrorKind::CannotCreateLock,
                "Cannot create mutex",
            ));
        };

        Ok(Self {
            state: StateLock::new(Ownership::default()),
            condvar: Condvar::new(),
            handle,
        })
    }

    /// Whether any live or terminated thread currently owns the mutex
    pub fn is_owned(&self) -> bool {
        self.state.lock().owner.is_some()
    }

    /// Recursion depth held by the calling thread (0 if not the owner)
    pub fn held_depth(&self) -> usize {
        let state = self.state.lock();
        match &state.owner {
            Some(owner) if owner.is_current() => state.depth,
            _ => 0,
        }
    }

    fn wait_raw(&self, timeout: Option<Duration>) -> RawStatus {
        let me = ThreadToken::current();
        let deadline = Deadline::after(timeout);
        let mut guard = self.state.lock();

        loop {
            {
                let state = &mut *guard;
                match &state.owner {
                    None => {
                        state.owner = Some(OwnerRecord::current());
                        state.depth = 1;
                        return RawStatus::Signaled;
                    }
                    Some(owner) if owner.token() == me => {
                        let Some(depth) = state.depth.checked_add(1) else {
                            return RawStatus::Refused;
                        };
                        state.depth = depth;
                        return RawStatus::Signaled;
                    }
                    Some(owner) if !owner.is_alive() => {
                        warn!(
                            handle = %self.handle.id(),
                            previous_owner = %owner.token(),
                            "mutex abandoned by terminated thread"
                        );
                        state.owner = Some(OwnerRecord::current());
                        state.depth = 1;
                        return RawStatus::OwnerDied;
                    }
                    Some(_) => {}
                }
            }

            if deadline.is_elapsed() {
                return RawStatus::TimedOut;
            }

            // Owner death is never signaled, so wake periodically to look for it
            let recheck = Instant::now() + ABANDONMENT_CHECK_INTERVAL;
            let wake_at = match deadline.instant() {
                Some(at) if at < recheck => at,
                _ => recheck,
            };
            self.condvar.wait_until(&mut guard, wake_at);
        }
    }

    fn release_raw(&self) -> RawStatus {
        let mut state = self.state.lock();
        let is_owner = matches!(&state.owner, Some(owner) if owner.is_current());
        if !is_owner {
            return RawStatus::Refused;
        }

        state.depth -= 1;
        if state.depth == 0 {
            state.owner = None;
            drop(state);
            self.condvar.notify_one();
        }
        RawStatus::Signaled
    }
}

impl Waitable for Mutex {
    fn wait(&self, timeout: Option<Duration>) -> WaitOutcome {
        let outcome: WaitOutcome = self.wait_raw(timeout).into();
        trace!(handle = %self.handle.id(), %outcome, "mutex wait");
        outcome
    }

    fn name(&self) -> &'static str {
        "mutex"
    }
}

impl Releasable for Mutex {
    fn release(&self) -> WaitOutcome {
        let outcome: WaitOutcome = self.release_raw().into();
        trace!(handle = %self.handle.id(), %outcome, "mutex release");
        outcome
    }
}

impl std::fmt::Debug for Mutex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Mutex")
            .field("handle", &self.handle.id())
            .field("owner", &state.owner.as_ref().map(|o| o.token()))
            .field("depth", &state.depth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_wait_and_release() {
        let mutex = Mutex::new().unwrap();
        assert_eq!(mutex.wait(None), WaitOutcome::Ok);
        assert!(mutex.is_owned());
        assert_eq!(mutex.release(), WaitOutcome::Ok);
        assert!(!mutex.is_owned());
    }

    #[test]
    fn test_recursive_ownership() {
        let mutex = Mutex::new().unwrap();
        assert_eq!(mutex.wait(None), WaitOutcome::Ok);
        assert_eq!(mutex.wait(None), WaitOutcome::Ok);
        assert_eq!(mutex.held_depth(), 2);

        assert_eq!(mutex.release(), WaitOutcome::Ok);
        assert!(mutex.is_owned());
        assert_eq!(mutex.release(), WaitOutcome::Ok);
        assert!(!mutex.is_owned());
    }

    #[test]
    fn test_release_without_wait_fails() {
        let mutex = Mutex::new().unwrap();
        assert_eq!(mutex.release(), WaitOutcome::Failed);
    }

    #[test]
    fn test_release_by_non_owner_fails() {
        let mutex = Arc::new(Mutex::new().unwrap());
        assert_eq!(mutex.wait(None), WaitOutcome::Ok);

        let other = mutex.clone();
        let outcome = thread::spawn(move || other.release()).join().unwrap();
        assert_eq!(outcome, WaitOutcome::Failed);

        assert_eq!(mutex.release(), WaitOutcome::Ok);
    }

    #[test]
    fn test_contended_wait_times_out() {
        let mutex = Arc::new(Mutex::new().unwrap());
        assert_eq!(mutex.wait(None), WaitOutcome::Ok);

        let other = mutex.clone();
        let outcome = thread::spawn(move || other.wait(Some(Duration::from_millis(30))))
            .join()
            .unwrap();
        assert_eq!(outcome, WaitOutcome::Timeout);

        assert_eq!(mutex.release(), WaitOutcome::Ok);
    }

    #[test]
    fn test_abandoned_by_terminated_owner() {
        let mutex = Arc::new(Mutex::new().unwrap());

        let other = mutex.clone();
        let acquired = thread::spawn(move || other.wait(None)).join().unwrap();
        assert_eq!(acquired, WaitOutcome::Ok);

        assert_eq!(mutex.wait(Some(Duration::from_secs(1))), WaitOutcome::Abandoned);
        assert_eq!(mutex.held_depth(), 1);
        assert_eq!(mutex.release(), WaitOutcome::Ok);
    }
}
