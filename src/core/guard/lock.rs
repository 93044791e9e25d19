/*!
 * Parametrized Lock Guard
 *
 * Strict read-write lock guard with the mode fixed by a const parameter.
 * Unlike the lenient read/write guards, a missing lock is an error.
 */

use super::rw::Hold;
use super::traits::Guard;
use super::GuardMetadata;
use crate::core::errors::{LockErrorKind, SyncError, SyncResult};
use crate::core::sync::{LockMode, ReadWriteLock};

/// Lock guard holding `L` exclusively when `EXCLUSIVE`, shared otherwise
///
/// # Example
///
/// ```ignore
/// let _guard = ExclusiveLockGuard::new(Some(&lock))?;
/// // exclusive section
/// ```
pub struct LockGuard<'a, L: ReadWriteLock + ?Sized, const EXCLUSIVE: bool> {
    hold: Hold<'a, L>,
}

/// Exclusive-mode lock guard
pub type ExclusiveLockGuard<'a, L> = LockGuard<'a, L, true>;

/// Shared-mode lock guard
pub type SharedLockGuard<'a, L> = LockGuard<'a, L, false>;

impl<'a, L: ReadWriteLock + ?Sized, const EXCLUSIVE: bool> LockGuard<'a, L, EXCLUSIVE> {
    /// Mode this guard type acquires
    pub const MODE: LockMode = if EXCLUSIVE {
        LockMode::Exclusive
    } else {
        LockMode::Shared
    };

    /// Block until `lock` is held in [`Self::MODE`]
    ///
    /// # Errors
    ///
    /// `MissingLock` for `None`; `CannotAcquireWrite` / `CannotAcquireRead`
    /// when the lock refuses.
    #[track_caller]
    pub fn new(lock: Option<&'a L>) -> SyncResult<Self> {
        if lock.is_none() {
            return Err(SyncError::new(
                LockErrorKind::MissingLock,
                format!("{} lock guard requires a lock", Self::MODE),
            ));
        }
        Ok(Self {
            hold: Hold::acquire(lock, Self::MODE, None)?,
        })
    }

    #[inline]
    pub fn mode(&self) -> LockMode {
        Self::MODE
    }
}

impl<L: ReadWriteLock + ?Sized, const EXCLUSIVE: bool> Guard for LockGuard<'_, L, EXCLUSIVE> {
    fn resource_type(&self) -> &'static str {
        if EXCLUSIVE {
            "exclusive_lock"
        } else {
            "shared_lock"
        }
    }

    fn metadata(&self) -> &GuardMetadata {
        self.hold.metadata()
    }

    fn is_held(&self) -> bool {
        self.hold.is_held()
    }
}

impl<L: ReadWriteLock + ?Sized, const EXCLUSIVE: bool> std::fmt::Debug
    for LockGuard<'_, L, EXCLUSIVE>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGuard")
            .field("mode", &Self::MODE)
            .field("held", &self.hold.is_held())
            .finish()
    }
}
