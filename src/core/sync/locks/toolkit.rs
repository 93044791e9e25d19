/*!
 * Toolkit Reader-Writer Lock
 *
 * Backend over a raw reader-writer lock with native timed acquisition
 * (`RawRwLockTimed`) and recursive shared acquisition (`RawRwLockRecursive`).
 *
 * # Recursion Modes
 *
 * Fixed at construction:
 * - **Recursive**: the exclusive holder may acquire again in either mode
 *   (counted as write recursion, released level by level); shared holders
 *   may acquire shared again even while a writer is queued
 * - **NonRecursive**: any re-acquisition by the exclusive holder returns
 *   `false`
 */

use super::hold::HoldState;
use super::traits::{LockMode, ReadWriteLock};
use crate::core::errors::{LockErrorKind, SyncError, SyncResult};
use crate::core::id::ThreadToken;
use crate::core::sync::config::RecursionMode;
use crate::core::sync::handle::{handle_table, Handle, HandleKind};
use parking_lot::lock_api::{
    RawRwLock as _, RawRwLockRecursive as _, RawRwLockRecursiveTimed as _, RawRwLockTimed as _,
};
use parking_lot::RawRwLock;
use std::time::Duration;
use tracing::{debug, trace};

/// Reader-writer lock with native timeouts and selectable recursion
pub struct ToolkitReadWriteLock {
    raw: RawRwLock,
    hold: HoldState,
    recursion: RecursionMode,
    handle: Handle,
}

impl ToolkitReadWriteLock {
    /// Create a lock with the given recursion mode
    #[track_caller]
    pub fn new(recursion: RecursionMode) -> SyncResult<Self> {
        let Some(handle) = handle_table().register(HandleKind::RwLock) else {
            return Err(SyncError::new(
                LockErrorKind::CannotCreateLock,
                "Cannot create toolkit read-write lock",
            ));
        };

        Ok(Self {
            raw: RawRwLock::INIT,
            hold: HoldState::new(),
            recursion,
            handle,
        })
    }

    #[track_caller]
    pub fn recursive() -> SyncResult<Self> {
        Self::new(RecursionMode::Recursive)
    }

    #[track_caller]
    pub fn non_recursive() -> SyncResult<Self> {
        Self::new(RecursionMode::NonRecursive)
    }

    #[inline]
    pub fn recursion(&self) -> RecursionMode {
        self.recursion
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

    /// Exclusive recursion depth held by the calling thread
    pub fn write_depth(&self) -> usize {
        if self.hold.is_writer(ThreadToken::current()) {
            self.hold.write_depth()
        } else {
            0
        }
    }

    /// Handle a request from the current exclusive holder
    ///
    /// Returns `Some(result)` when `me` is the writer, `None` otherwise.
    fn reenter(&self, me: ThreadToken, mode: LockMode) -> Option<bool> {
        if !self.hold.is_writer(me) {
            return None;
        }
        if self.recursion.is_recursive() {
            self.hold.nest_write();
            Some(true)
        } else {
            debug!(handle = %self.handle.id(), %mode, "re-entry refused on non-recursive lock");
            Some(false)
        }
    }

    fn release_exclusive(&self, me: ThreadToken) -> bool {
        match self.hold.leave_write(me) {
            Some(true) => {
                // SAFETY: `me` was the exclusive holder at depth 1.
                unsafe { self.raw.unlock_exclusive() };
                true
            }
            Some(false) => true,
            None => false,
        }
    }

    fn release_shared(&self, me: ThreadToken) -> bool {
        // A read taken by the writer was counted as a nested write level
        if self.hold.is_writer(me) && self.hold.write_depth() > 1 {
            return self.release_exclusive(me);
        }
        if self.hold.leave_read() {
            // SAFETY: the reader count was positive, so a shared hold is outstanding.
            unsafe { self.raw.unlock_shared() };
            true
        } else {
            false
        }
    }

    fn acquire_shared(&self, timeout: Option<Duration>) -> bool {
        let acquired = match (timeout, self.recursion) {
            (None, RecursionMode::Recursive) => {
                self.raw.lock_shared_recursive();
                true
            }
            (None, RecursionMode::NonRecursive) => {
                self.raw.lock_shared();
                true
            }
            (Some(t), RecursionMode::Recursive) => self.raw.try_lock_shared_recursive_for(t),
            (Some(t), RecursionMode::NonRecursive) => self.raw.try_lock_shared_for(t),
        };
        if acquired {
            self.hold.enter_read();
        }
        acquired
    }
}

impl ReadWriteLock for ToolkitReadWriteLock {
    fn lock_for_read(&self) -> bool {
        if let Some(result) = self.reenter(ThreadToken::current(), LockMode::Shared) {
            return result;
        }
        self.acquire_shared(None)
    }

    fn lock_for_write(&self) -> bool {
        let me = ThreadToken::current();
        if let Some(result) = self.reenter(me, LockMode::Exclusive) {
            return result;
        }
        self.raw.lock_exclusive();
        self.hold.enter_write(me);
        true
    }

    fn try_lock_for_read(&self, timeout: Duration) -> bool {
        if let Some(result) = self.reenter(ThreadToken::current(), LockMode::Shared) {
            return result;
        }
        let acquired = self.acquire_shared(Some(timeout));
        trace!(handle = %self.handle.id(), acquired, ?timeout, "toolkit try read");
        acquired
    }

    fn try_lock_for_write(&self, timeout: Duration) -> bool {
        let me = ThreadToken::current();
        if let Some(result) = self.reenter(me, LockMode::Exclusive) {
            return result;
        }
        let acquired = self.raw.try_lock_exclusive_for(timeout);
        if acquired {
            self.hold.enter_write(me);
        }
        trace!(handle = %self.handle.id(), acquired, ?timeout, "toolkit try write");
        acquired
    }

    fn unlock_mode(&self, mode: LockMode) {
        let me = ThreadToken::current();
        let released = match mode {
            LockMode::Exclusive => self.release_exclusive(me),
            LockMode::Shared => self.release_shared(me),
        };
        if !released {
            debug!(handle = %self.handle.id(), %mode, "unlock without matching hold");
        }
    }

    fn unlock(&self) {
        let me = ThreadToken::current();
        if !self.release_exclusive(me) && !self.release_shared(me) {
            debug!(handle = %self.handle.id(), "unlock without any hold");
        }
    }

    fn name(&self) -> &'static str {
        "toolkit"
    }
}

impl std::fmt::Debug for ToolkitReadWriteLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolkitReadWriteLock")
            .field("handle", &self.handle.id())
            .field("recursion", &self.recursion)
            .field("exclusive", &self.hold.has_writer())
            .field("readers", &self.hold.readers())
            .finish()
    }
}
