/*!
 * Combined Read-Write Guard
 *
 * Takes the exclusive mode and then the shared mode of one lock, and releases
 * them in reverse order. The stage records which steps succeeded so drop
 * releases exactly those, including after a partial failure during
 * construction.
 *
 * The shared step only succeeds on locks that let the exclusive holder read,
 * i.e. a recursive toolkit lock.
 */

use super::observe::notify;
use super::traits::Guard;
use super::GuardMetadata;
use crate::core::errors::{LockErrorKind, SyncError, SyncResult};
use crate::core::sync::{LockMode, ReadWriteLock};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Steps of the combined guard that currently hold the lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Empty,
    Exclusive,
    ExclusiveShared,
}

/// Guard holding one lock in both exclusive and shared mode
///
/// `!Send`: the exclusive step is owned by the acquiring thread.
///
/// ```compile_fail
/// use synctl::{ReadWriteSynchronizer, ToolkitReadWriteLock};
///
/// let lock: &'static ToolkitReadWriteLock =
///     Box::leak(Box::new(ToolkitReadWriteLock::recursive().unwrap()));
/// let guard = ReadWriteSynchronizer::new(Some(lock)).unwrap();
/// std::thread::spawn(move || drop(guard));
/// ```
pub struct ReadWriteSynchronizer<'a, L: ReadWriteLock + ?Sized> {
    lock: Option<&'a L>,
    stage: Stage,
    metadata: GuardMetadata,
    _not_send: PhantomData<*const ()>,
}

impl<'a, L: ReadWriteLock + ?Sized> ReadWriteSynchronizer<'a, L> {
    /// Acquire exclusive, then shared
    ///
    /// A `None` lock yields an empty guard.
    ///
    /// # Errors
    ///
    /// `CannotAcquireWrite` if the exclusive step fails (nothing held);
    /// `CannotAcquireRead` if the shared step fails (the exclusive hold is
    /// released before returning).
    #[track_caller]
    pub fn new(lock: Option<&'a L>) -> SyncResult<Self> {
        let mut guard = Self {
            lock,
            stage: Stage::Empty,
            metadata: GuardMetadata::new(lock.map_or("none", |l| l.name())),
            _not_send: PhantomData,
        };
        let Some(lock) = lock else {
            return Ok(guard);
        };

        if !lock.lock_for_write() {
            return Err(SyncError::new(
                LockErrorKind::CannotAcquireWrite,
                format!("Cannot acquire exclusive lock ({})", lock.name()),
            ));
        }
        guard.stage = Stage::Exclusive;
        notify(|o| o.on_acquired(lock.name(), LockMode::Exclusive));

        if !lock.lock_for_read() {
            // Dropping the guard releases the exclusive step
            return Err(SyncError::new(
                LockErrorKind::CannotAcquireRead,
                format!("Cannot acquire shared lock ({}) while exclusive", lock.name()),
            ));
        }
        guard.stage = Stage::ExclusiveShared;
        notify(|o| o.on_acquired(lock.name(), LockMode::Shared));

        Ok(guard)
    }

    #[inline]
    pub fn stage(&self) -> Stage {
        self.stage
    }
}

impl<L: ReadWriteLock + ?Sized> Guard for ReadWriteSynchronizer<'_, L> {
    fn resource_type(&self) -> &'static str {
        "read_write_lock"
    }

    fn metadata(&self) -> &GuardMetadata {
        &self.metadata
    }

    fn is_held(&self) -> bool {
        self.stage != Stage::Empty
    }
}

impl<L: ReadWriteLock + ?Sized> Drop for ReadWriteSynchronizer<'_, L> {
    fn drop(&mut self) {
        let Some(lock) = self.lock else {
            return;
        };

        if self.stage == Stage::ExclusiveShared {
            lock.unlock_mode(LockMode::Shared);
            notify(|o| o.on_released(lock.name(), LockMode::Shared));
            self.stage = Stage::Exclusive;
        }
        if self.stage == Stage::Exclusive {
            lock.unlock_mode(LockMode::Exclusive);
            notify(|o| o.on_released(lock.name(), LockMode::Exclusive));
            self.stage = Stage::Empty;
        }
    }
}

impl<L: ReadWriteLock + ?Sized> std::fmt::Debug for ReadWriteSynchronizer<'_, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadWriteSynchronizer")
            .field("stage", &self.stage)
            .finish()
    }
}
