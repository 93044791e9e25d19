/*!
 * Read-Write Lock Traits
 *
 * Core abstraction over reader-writer primitives.
 *
 * # Design: Trait Objects at the Backend Seam
 *
 * Backends are chosen at runtime from configuration, so the lock is used as
 * `dyn ReadWriteLock`. Guards are generic over `L: ReadWriteLock + ?Sized`
 * and work the same with a concrete lock or a boxed one.
 */

use crate::core::limits::timeout_from_millis;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Mode in which a read-write lock is held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockMode {
    /// Any number of concurrent holders
    Shared,
    /// A single holder, excluding every other mode
    Exclusive,
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shared => f.write_str("shared"),
            Self::Exclusive => f.write_str("exclusive"),
        }
    }
}

/// Reader-writer lock
///
/// At any time the lock has either one exclusive holder or any number of
/// shared holders, never both.
///
/// # Contract
///
/// - `lock_for_*` block until acquired; `false` means the acquisition can
///   never succeed from this thread (a self-deadlock was detected)
/// - `try_lock_for_*` give up after `timeout` and report whether they hold
///   the lock; a zero timeout is a single attempt
/// - `unlock_mode` releases one hold of `mode` taken by the caller; it is a
///   no-op when there is none
/// - `unlock` releases whatever the calling thread holds, exclusive first
pub trait ReadWriteLock: Send + Sync {
    /// Block until held in shared mode
    fn lock_for_read(&self) -> bool;

    /// Block until held in exclusive mode
    fn lock_for_write(&self) -> bool;

    /// Try to acquire shared mode within `timeout`
    fn try_lock_for_read(&self, timeout: Duration) -> bool;

    /// Try to acquire exclusive mode within `timeout`
    fn try_lock_for_write(&self, timeout: Duration) -> bool;

    /// Release one hold of `mode`
    fn unlock_mode(&self, mode: LockMode);

    /// Release the calling thread's hold, whichever mode it is
    fn unlock(&self);

    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Block until held in `mode`
    #[inline]
    fn lock(&self, mode: LockMode) -> bool {
        match mode {
            LockMode::Shared => self.lock_for_read(),
            LockMode::Exclusive => self.lock_for_write(),
        }
    }

    /// Try to acquire `mode` within `timeout`
    #[inline]
    fn try_lock(&self, mode: LockMode, timeout: Duration) -> bool {
        match mode {
            LockMode::Shared => self.try_lock_for_read(timeout),
            LockMode::Exclusive => self.try_lock_for_write(timeout),
        }
    }

    /// Timed acquisition with a raw millisecond timeout
    ///
    /// The infinite sentinel blocks like [`ReadWriteLock::lock`].
    fn try_lock_millis(&self, mode: LockMode, timeout_millis: u32) -> bool {
        match timeout_from_millis(timeout_millis) {
            Some(timeout) => self.try_lock(mode, timeout),
            None => self.lock(mode),
        }
    }
}

impl<L: ReadWriteLock + ?Sized> ReadWriteLock for Box<L> {
    fn lock_for_read(&self) -> bool {
        (**self).lock_for_read()
    }

    fn lock_for_write(&self) -> bool {
        (**self).lock_for_write()
    }

    fn try_lock_for_read(&self, timeout: Duration) -> bool {
        (**self).try_lock_for_read(timeout)
    }

    fn try_lock_for_write(&self, timeout: Duration) -> bool {
        (**self).try_lock_for_write(timeout)
    }

    fn unlock_mode(&self, mode: LockMode) {
        (**self).unlock_mode(mode)
    }

    fn unlock(&self) {
        (**self).unlock()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<L: ReadWriteLock + ?Sized> ReadWriteLock for std::sync::Arc<L> {
    fn lock_for_read(&self) -> bool {
        (**self).lock_for_read()
    }

    fn lock_for_write(&self) -> bool {
        (**self).lock_for_write()
    }

    fn try_lock_for_read(&self, timeout: Duration) -> bool {
        (**self).try_lock_for_read(timeout)
    }

    fn try_lock_for_write(&self, timeout: Duration) -> bool {
        (**self).try_lock_for_write(timeout)
    }

    fn unlock_mode(&self, mode: LockMode) {
        (**self).unlock_mode(mode)
    }

    fn unlock(&self) {
        (**self).unlock()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
