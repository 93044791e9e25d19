/*!
 * Slim Reader-Writer Lock
 *
 * Backend over a raw reader-writer primitive whose only non-blocking entry
 * points are untimed try-acquires.
 *
 * # Design: Polled Timed Acquire
 *
 * There is no native "acquire within T", so a timed attempt polls the
 * try-acquire primitive and sleeps between attempts for the poll cap or the
 * remaining budget, whichever is smaller:
 *
 * 1. Attempt; on success return `true` immediately, lock held
 * 2. Budget exhausted: return `false`, nothing held
 * 3. Otherwise sleep `min(cap, remaining)` and go to 1
 *
 * A budget too large to represent as a deadline polls at the cap until it
 * succeeds.
 *
 * The lock is not recursive. Re-acquiring while holding the exclusive mode
 * returns `false` instead of deadlocking.
 */

use super::hold::HoldState;
use super::traits::{LockMode, ReadWriteLock};
use crate::core::errors::{LockErrorKind, SyncError, SyncResult};
use crate::core::id::ThreadToken;
use crate::core::limits::DEFAULT_POLL_INTERVAL_CAP;
use crate::core::sync::deadline::Deadline;
use crate::core::sync::handle::{handle_table, Handle, HandleKind};
use parking_lot::lock_api::RawRwLock as _;
use parking_lot::RawRwLock;
use std::thread;
use std::time::Duration;
use tracing::{debug, trace};

/// Non-recursive reader-writer lock with polled timed acquisition
pub struct SlimReadWriteLock {
    raw: RawRwLock,
    hold: HoldState,
    poll_cap: Duration,
    handle: Handle,
}

impl SlimReadWriteLock {
    /// Create a lock with the default 1s poll cap
    #[track_caller]
    pub fn new() -> SyncResult<Self> {
        Self::with_poll_cap(DEFAULT_POLL_INTERVAL_CAP)
    }

    /// Create a lock sleeping at most `poll_cap` between timed attempts
    #[track_caller]
    pub fn with_poll_cap(poll_cap: Duration) -> SyncResult<Self> {
        let Some(handle) = handle_table().register(HandleKind::RwLock) else {
            return Err(SyncError::new(
                LockErrorKind::CannotCreateLock,
                "Cannot create slim read-write lock",
            ));
        };

        Ok(Self {
            raw: RawRwLock::INIT,
            hold: HoldState::new(),
            poll_cap: poll_cap.max(Duration::from_millis(1)),
            handle,
        })
    }

    #[inline]
    pub fn poll_cap(&self) -> Duration {
        self.poll_cap
    }

    /// Whether any thread holds the lock exclusively
    #[inline]
    pub fn is_locked_exclusive(&self) -> bool {
        self.hold.has_writer()
    }

    /// Number of outstanding shared holds
    #[inline]
    pub fn reader_count(&self) -> usize {
        self.hold.readers()
    }

    /// Poll `attempt` until it succeeds or `timeout` is spent
    fn poll_acquire(&self, timeout: Duration, mut attempt: impl FnMut() -> bool) -> bool {
        let deadline = Deadline::after(Some(timeout));
        let sleep_cap = self.poll_cap.min(timeout);

        loop {
            if attempt() {
                return true;
            }

            match deadline.remaining() {
                Some(remaining) if remaining.is_zero() => return false,
                Some(remaining) => thread::sleep(sleep_cap.min(remaining)),
                // Budget past the clock's range never runs out
                None => thread::sleep(self.poll_cap),
            }
        }
    }

    fn release_exclusive(&self, me: ThreadToken) -> bool {
        match self.hold.leave_write(me) {
            Some(_) => {
                // SAFETY: `me` was recorded as the exclusive holder, so the raw
                // lock is held exclusively by this thread.
                unsafe { self.raw.unlock_exclusive() };
                true
            }
            None => false,
        }
    }

    fn release_shared(&self) -> bool {
        if self.hold.leave_read() {
            // SAFETY: the reader count was positive, so at least one shared
            // hold on the raw lock is outstanding.
            unsafe { self.raw.unlock_shared() };
            true
        } else {
            false
        }
    }
}

impl ReadWriteLock for SlimReadWriteLock {
    fn lock_for_read(&self) -> bool {
        if self.hold.is_writer(ThreadToken::current()) {
            debug!(handle = %self.handle.id(), "read requested while holding write");
            return false;
        }
        self.raw.lock_shared();
        self.hold.enter_read();
        true
    }

    fn lock_for_write(&self) -> bool {
        let me = ThreadToken::current();
        if self.hold.is_writer(me) {
            debug!(handle = %self.handle.id(), "write requested while holding write");
            return false;
        }
        self.raw.lock_exclusive();
        self.hold.enter_write(me);
        true
    }

    fn try_lock_for_read(&self, timeout: Duration) -> bool {
        if self.hold.is_writer(ThreadToken::current()) {
            return false;
        }
        let acquired = self.poll_acquire(timeout, || self.raw.try_lock_shared());
        if acquired {
            self.hold.enter_read();
        }
        trace!(handle = %self.handle.id(), acquired, ?timeout, "slim try read");
        acquired
    }

    fn try_lock_for_write(&self, timeout: Duration) -> bool {
        let me = ThreadToken::current();
        if self.hold.is_writer(me) {
            return false;
        }
        let acquired = self.poll_acquire(timeout, || self.raw.try_lock_exclusive());
        if acquired {
            self.hold.enter_write(me);
        }
        trace!(handle = %self.handle.id(), acquired, ?timeout, "slim try write");
        acquired
    }

    fn unlock_mode(&self, mode: LockMode) {
        let released = match mode {
            LockMode::Exclusive => self.release_exclusive(ThreadToken::current()),
            LockMode::Shared => self.release_shared(),
        };
        if !released {
            debug!(handle = %self.handle.id(), %mode, "unlock without matching hold");
        }
    }

    fn unlock(&self) {
        if !self.release_exclusive(ThreadToken::current()) {
            self.release_shared();
        }
    }

    fn name(&self) -> &'static str {
        "slim"
    }
}

impl std::fmt::Debug for SlimReadWriteLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlimReadWriteLock")
            .field("handle", &self.handle.id())
            .field("exclusive", &self.hold.has_writer())
            .field("readers", &self.hold.readers())
            .field("poll_cap", &self.poll_cap)
            .finish()
    }
}
