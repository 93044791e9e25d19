/*!
 * Waitable Object Guard
 *
 * Holds a releasable object (typically a `Mutex`) for the lifetime of a scope.
 *
 * # Outcomes
 *
 * - `Ok`: held
 * - `Abandoned`: held; the previous owner died, so protected state may be
 *   inconsistent and a warning is logged
 * - `Timeout` / `Failed`: construction fails with `CannotAcquireWrite`
 */

use super::observe::notify;
use super::traits::Guard;
use super::GuardMetadata;
use crate::core::errors::{LockErrorKind, SyncError, SyncResult, WaitOutcome};
use crate::core::sync::{LockMode, Releasable};
use std::marker::PhantomData;
use tracing::warn;

/// Scope guard over a releasable waitable object
///
/// Ownership of a `Mutex` belongs to the waiting thread, so the guard cannot
/// leave it:
///
/// ```compile_fail
/// use synctl::{Mutex, Synchronizer};
///
/// let mutex: &'static Mutex = Box::leak(Box::new(Mutex::new().unwrap()));
/// let guard = Synchronizer::acquire(mutex).unwrap();
/// std::thread::spawn(move || drop(guard));
/// ```
pub struct Synchronizer<'a, S: Releasable + ?Sized> {
    object: &'a S,
    outcome: WaitOutcome,
    metadata: GuardMetadata,
    _not_send: PhantomData<*const ()>,
}

impl<'a, S: Releasable + ?Sized> Synchronizer<'a, S> {
    /// Wait on `object` without timeout
    ///
    /// # Errors
    ///
    /// `MissingLock` for `None`, `CannotAcquireWrite` if the wait does not
    /// yield ownership.
    #[track_caller]
    pub fn new(object: Option<&'a S>) -> SyncResult<Self> {
        let Some(object) = object else {
            return Err(SyncError::new(
                LockErrorKind::MissingLock,
                "Synchronizer requires a waitable object",
            ));
        };

        let outcome = object.wait(None);
        match outcome {
            WaitOutcome::Ok => {}
            WaitOutcome::Abandoned => {
                warn!(resource = object.name(), "acquired abandoned object");
            }
            WaitOutcome::Timeout | WaitOutcome::Failed => {
                return Err(SyncError::new(
                    LockErrorKind::CannotAcquireWrite,
                    format!("Cannot acquire {}: wait returned {}", object.name(), outcome),
                )
                .with_system_code(outcome.code()));
            }
        }

        notify(|o| o.on_acquired(object.name(), LockMode::Exclusive));
        Ok(Self {
            object,
            outcome,
            metadata: GuardMetadata::new(object.name()),
            _not_send: PhantomData,
        })
    }

    /// Wait on an object that is known to exist
    #[track_caller]
    pub fn acquire(object: &'a S) -> SyncResult<Self> {
        Self::new(Some(object))
    }

    /// Outcome of the acquiring wait (`Ok` or `Abandoned`)
    #[inline]
    pub fn outcome(&self) -> WaitOutcome {
        self.outcome
    }

    #[inline]
    pub fn was_abandoned(&self) -> bool {
        self.outcome == WaitOutcome::Abandoned
    }
}

impl<S: Releasable + ?Sized> Guard for Synchronizer<'_, S> {
    fn resource_type(&self) -> &'static str {
        self.object.name()
    }

    fn metadata(&self) -> &GuardMetadata {
        &self.metadata
    }

    fn is_held(&self) -> bool {
        true
    }
}

impl<S: Releasable + ?Sized> Drop for Synchronizer<'_, S> {
    fn drop(&mut self) {
        let resource = self.object.name();
        match self.object.release() {
            WaitOutcome::Ok => notify(|o| o.on_released(resource, LockMode::Exclusive)),
            outcome => notify(|o| o.on_release_failed(resource, outcome)),
        }
    }
}

impl<S: Releasable + ?Sized> std::fmt::Debug for Synchronizer<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synchronizer")
            .field("resource", &self.object.name())
            .field("outcome", &self.outcome)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sync::{Mutex, Waitable};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Releasable that reports a fixed wait outcome and counts releases
    struct Scripted {
        outcome: WaitOutcome,
        releases: AtomicUsize,
    }

    impl Scripted {
        fn new(outcome: WaitOutcome) -> Self {
            Self {
                outcome,
                releases: AtomicUsize::new(0),
            }
        }
    }

    impl Waitable for Scripted {
        fn wait(&self, _timeout: Option<Duration>) -> WaitOutcome {
            self.outcome
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    impl Releasable for Scripted {
        fn release(&self) -> WaitOutcome {
            self.releases.fetch_add(1, Ordering::SeqCst);
            WaitOutcome::Ok
        }
    }

    #[test]
    fn test_missing_object() {
        let err = Synchronizer::<Mutex>::new(None).unwrap_err();
        assert_eq!(err.kind(), LockErrorKind::MissingLock);
    }

    #[test]
    fn test_holds_and_releases_mutex() {
        let mutex = Mutex::new().unwrap();
        {
            let guard = Synchronizer::acquire(&mutex).unwrap();
            assert!(guard.is_held());
            assert_eq!(guard.outcome(), WaitOutcome::Ok);
            assert!(mutex.is_owned());
        }
        assert!(!mutex.is_owned());
    }

    #[test]
    fn test_abandoned_counts_as_held() {
        let object = Scripted::new(WaitOutcome::Abandoned);
        {
            let guard = Synchronizer::acquire(&object).unwrap();
            assert!(guard.was_abandoned());
        }
        assert_eq!(object.releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_wait_holds_nothing() {
        for outcome in [WaitOutcome::Timeout, WaitOutcome::Failed] {
            let object = Scripted::new(outcome);
            let err = Synchronizer::acquire(&object).unwrap_err();
            assert_eq!(err.kind(), LockErrorKind::CannotAcquireWrite);
            assert_eq!(err.system_code(), Some(outcome.code()));
            assert_eq!(object.releases.load(Ordering::SeqCst), 0);
        }
    }

    #[test]
    fn test_works_through_trait_object() {
        let mutex = Mutex::new().unwrap();
        let object: &dyn Releasable = &mutex;
        let guard = Synchronizer::acquire(object).unwrap();
        assert_eq!(guard.resource_type(), "mutex");
    }
}
