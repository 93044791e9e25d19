/*!
 * Guard Observer Hook
 *
 * Process-wide hook notified when guards acquire and release. Release
 * failures inside `Drop` cannot be returned, so this hook is where they go.
 *
 * The default observer logs through `tracing`. A panicking observer is
 * contained and never unwinds through a guard.
 */

use crate::core::errors::WaitOutcome;
use crate::core::sync::LockMode;
use parking_lot::RwLock;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{trace, warn};

/// Receives guard lifecycle notifications
pub trait SyncObserver: Send + Sync {
    /// A guard acquired `resource` in `mode`
    fn on_acquired(&self, resource: &'static str, mode: LockMode);

    /// A guard released `resource` held in `mode`
    fn on_released(&self, resource: &'static str, mode: LockMode);

    /// Releasing `resource` did not succeed
    fn on_release_failed(&self, resource: &'static str, outcome: WaitOutcome);
}

/// Default observer: trace on acquire/release, warn on failure
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SyncObserver for TracingObserver {
    fn on_acquired(&self, resource: &'static str, mode: LockMode) {
        trace!(resource, %mode, "guard acquired");
    }

    fn on_released(&self, resource: &'static str, mode: LockMode) {
        trace!(resource, %mode, "guard released");
    }

    fn on_release_failed(&self, resource: &'static str, outcome: WaitOutcome) {
        warn!(resource, %outcome, code = outcome.code(), "guard release failed");
    }
}

static OBSERVER: RwLock<Option<Arc<dyn SyncObserver>>> = parking_lot::const_rwlock(None);

/// Install a process-wide observer, returning the previous one
pub fn set_observer(observer: Arc<dyn SyncObserver>) -> Option<Arc<dyn SyncObserver>> {
    OBSERVER.write().replace(observer)
}

/// Restore the default tracing observer
pub fn reset_observer() -> Option<Arc<dyn SyncObserver>> {
    OBSERVER.write().take()
}

/// Deliver one notification to the installed observer
pub(super) fn notify(event: impl FnOnce(&dyn SyncObserver)) {
    // Clone out so the observer runs without the hook lock held
    let installed = OBSERVER.read().clone();
    let result = catch_unwind(AssertUnwindSafe(|| match installed.as_deref() {
        Some(observer) => event(observer),
        None => event(&TracingObserver),
    }));
    if result.is_err() {
        warn!("sync observer panicked; notification dropped");
    }
}
