/*!
 * Read-Write Lock Guards
 *
 * Lenient guards: a `None` lock yields a guard that holds nothing and whose
 * drop does nothing. Blocking variants wait indefinitely; `Try*` variants
 * give up after a timeout.
 *
 * Each guard remembers the mode it acquired and releases exactly that mode,
 * so concurrent guards on one lock never confuse each other's holds.
 */

use super::observe::notify;
use super::traits::Guard;
use super::GuardMetadata;
use crate::core::errors::{LockErrorKind, SyncError, SyncResult};
use crate::core::sync::{LockMode, ReadWriteLock};
use std::marker::PhantomData;
use std::time::Duration;

/// One optional hold of a lock in a fixed mode, released on drop
///
/// Locks record their exclusive owner per thread, so the hold must be
/// released on the thread that took it and is therefore `!Send`.
pub(super) struct Hold<'a, L: ReadWriteLock + ?Sized> {
    lock: Option<&'a L>,
    mode: LockMode,
    metadata: GuardMetadata,
    _not_send: PhantomData<*const ()>,
}

impl<'a, L: ReadWriteLock + ?Sized> Hold<'a, L> {
    /// Acquire `mode` on `lock`, blocking when `timeout` is `None`
    #[track_caller]
    pub(super) fn acquire(
        lock: Option<&'a L>,
        mode: LockMode,
        timeout: Option<Duration>,
    ) -> SyncResult<Self> {
        let Some(lock) = lock else {
            return Ok(Self {
                lock: None,
                mode,
                metadata: GuardMetadata::new("none"),
                _not_send: PhantomData,
            });
        };

        let acquired = match timeout {
            None => lock.lock(mode),
            Some(timeout) => lock.try_lock(mode, timeout),
        };
        if !acquired {
            let kind = match mode {
                LockMode::Shared => LockErrorKind::CannotAcquireRead,
                LockMode::Exclusive => LockErrorKind::CannotAcquireWrite,
            };
            let message = match timeout {
                None => format!("Cannot acquire {} lock ({})", mode, lock.name()),
                Some(t) => format!("Cannot acquire {} lock ({}) within {:?}", mode, lock.name(), t),
            };
            return Err(SyncError::new(kind, message));
        }

        notify(|o| o.on_acquired(lock.name(), mode));
        Ok(Self {
            lock: Some(lock),
            mode,
            metadata: GuardMetadata::new(lock.name()),
            _not_send: PhantomData,
        })
    }

    #[inline]
    pub(super) fn is_held(&self) -> bool {
        self.lock.is_some()
    }

    #[inline]
    pub(super) fn mode(&self) -> LockMode {
        self.mode
    }

    #[inline]
    pub(super) fn metadata(&self) -> &GuardMetadata {
        &self.metadata
    }
}

impl<L: ReadWriteLock + ?Sized> Drop for Hold<'_, L> {
    fn drop(&mut self) {
        if let Some(lock) = self.lock.take() {
            lock.unlock_mode(self.mode);
            notify(|o| o.on_released(lock.name(), self.mode));
        }
    }
}

/// Blocking shared-mode guard
pub struct ReadSynchronizer<'a, L: ReadWriteLock + ?Sized> {
    hold: Hold<'a, L>,
}

impl<'a, L: ReadWriteLock + ?Sized> ReadSynchronizer<'a, L> {
    /// # Errors
    ///
    /// `CannotAcquireRead` when the lock refuses the shared acquisition.
    #[track_caller]
    pub fn new(lock: Option<&'a L>) -> SyncResult<Self> {
        Ok(Self {
            hold: Hold::acquire(lock, LockMode::Shared, None)?,
        })
    }
}

/// Blocking exclusive-mode guard
///
/// Must be dropped on the thread that acquired it:
///
/// ```compile_fail
/// use synctl::{ToolkitReadWriteLock, WriteSynchronizer};
///
/// let lock: &'static ToolkitReadWriteLock =
///     Box::leak(Box::new(ToolkitReadWriteLock::recursive().unwrap()));
/// let guard = WriteSynchronizer::new(Some(lock)).unwrap();
/// std::thread::spawn(move || drop(guard));
/// ```
pub struct WriteSynchronizer<'a, L: ReadWriteLock + ?Sized> {
    hold: Hold<'a, L>,
}

impl<'a, L: ReadWriteLock + ?Sized> WriteSynchronizer<'a, L> {
    /// # Errors
    ///
    /// `CannotAcquireWrite` when the lock refuses the exclusive acquisition.
    #[track_caller]
    pub fn new(lock: Option<&'a L>) -> SyncResult<Self> {
        Ok(Self {
            hold: Hold::acquire(lock, LockMode::Exclusive, None)?,
        })
    }
}

/// Timed shared-mode guard
pub struct TryReadSynchronizer<'a, L: ReadWriteLock + ?Sized> {
    hold: Hold<'a, L>,
}

impl<'a, L: ReadWriteLock + ?Sized> TryReadSynchronizer<'a, L> {
    /// # Errors
    ///
    /// `CannotAcquireRead` when shared mode is not obtained within `timeout`.
    #[track_caller]
    pub fn new(lock: Option<&'a L>, timeout: Duration) -> SyncResult<Self> {
        Ok(Self {
            hold: Hold::acquire(lock, LockMode::Shared, Some(timeout))?,
        })
    }
}

/// Timed exclusive-mode guard
pub struct TryWriteSynchronizer<'a, L: ReadWriteLock + ?Sized> {
    hold: Hold<'a, L>,
}

impl<'a, L: ReadWriteLock + ?Sized> TryWriteSynchronizer<'a, L> {
    /// # Errors
    ///
    /// `CannotAcquireWrite` when exclusive mode is not obtained within `timeout`.
    #[track_caller]
    pub fn new(lock: Option<&'a L>, timeout: Duration) -> SyncResult<Self> {
        Ok(Self {
            hold: Hold::acquire(lock, LockMode::Exclusive, Some(timeout))?,
        })
    }
}

macro_rules! impl_rw_guard {
    ($($guard:ident => $name:literal),* $(,)?) => {$(
        impl<L: ReadWriteLock + ?Sized> $guard<'_, L> {
            /// Whether a lock is held (false for a guard built from `None`)
            #[inline]
            pub fn is_held(&self) -> bool {
                self.hold.is_held()
            }

            #[inline]
            pub fn mode(&self) -> LockMode {
                self.hold.mode()
            }
        }

        impl<L: ReadWriteLock + ?Sized> Guard for $guard<'_, L> {
            fn resource_type(&self) -> &'static str {
                $name
            }

            fn metadata(&self) -> &GuardMetadata {
                self.hold.metadata()
            }

            fn is_held(&self) -> bool {
                self.hold.is_held()
            }
        }

        impl<L: ReadWriteLock + ?Sized> std::fmt::Debug for $guard<'_, L> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($guard))
                    .field("held", &self.hold.is_held())
                    .field("mode", &self.hold.mode())
                    .finish()
            }
        }
    )*};
}

impl_rw_guard! {
    ReadSynchronizer => "read_lock",
    WriteSynchronizer => "write_lock",
    TryReadSynchronizer => "try_read_lock",
    TryWriteSynchronizer => "try_write_lock",
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sync::{SlimReadWriteLock, ToolkitReadWriteLock};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_none_lock_is_noop() {
        let read = ReadSynchronizer::<ToolkitReadWriteLock>::new(None).unwrap();
        let write = WriteSynchronizer::<ToolkitReadWriteLock>::new(None).unwrap();
        let try_read =
            TryReadSynchronizer::<ToolkitReadWriteLock>::new(None, Duration::ZERO).unwrap();
        let try_write =
            TryWriteSynchronizer::<ToolkitReadWriteLock>::new(None, Duration::ZERO).unwrap();
        assert!(!read.is_held());
        assert!(!write.is_held());
        assert!(!try_read.is_held());
        assert!(!try_write.is_held());
    }

    #[test]
    fn test_write_guard_releases_on_drop() {
        let lock = ToolkitReadWriteLock::recursive().unwrap();
        {
            let guard = WriteSynchronizer::new(Some(&lock)).unwrap();
            assert_eq!(guard.mode(), LockMode::Exclusive);
            assert!(lock.is_locked_exclusive());
        }
        assert!(!lock.is_locked_exclusive());
    }

    #[test]
    fn test_readers_share() {
        let lock = SlimReadWriteLock::with_poll_cap(Duration::from_millis(5)).unwrap();
        let first = ReadSynchronizer::new(Some(&lock)).unwrap();
        let second = TryReadSynchronizer::new(Some(&lock), Duration::ZERO).unwrap();
        assert_eq!(lock.reader_count(), 2);
        drop(first);
        drop(second);
        assert_eq!(lock.reader_count(), 0);
    }

    #[test]
    fn test_try_write_times_out_with_write_code() {
        let lock = Arc::new(SlimReadWriteLock::with_poll_cap(Duration::from_millis(5)).unwrap());
        let _reader = ReadSynchronizer::new(Some(&*lock)).unwrap();

        let other = lock.clone();
        let kind = thread::spawn(move || {
            TryWriteSynchronizer::new(Some(&*other), Duration::from_millis(20))
                .unwrap_err()
                .kind()
        })
        .join()
        .unwrap();

        assert_eq!(kind, LockErrorKind::CannotAcquireWrite);
    }

    #[test]
    fn test_refused_read_reports_read_code() {
        let lock = SlimReadWriteLock::new().unwrap();
        let _writer = WriteSynchronizer::new(Some(&lock)).unwrap();
        let err = ReadSynchronizer::new(Some(&lock)).unwrap_err();
        assert_eq!(err.kind(), LockErrorKind::CannotAcquireRead);
    }
}
