/*!
 * Event Object
 *
 * Signal/clear event backed by parking_lot's mutex and condvar.
 *
 * # Reset Modes
 *
 * - **Auto-reset**: one `set_event` releases exactly one waiter; the event
 *   clears itself as that waiter is released
 * - **Manual-reset**: stays signaled, releasing every current and future
 *   waiter, until `clear_event`
 */

use super::traits::{RawStatus, Waitable};
use crate::core::errors::{LockErrorKind, SyncError, SyncResult, WaitOutcome};
use crate::core::sync::deadline::Deadline;
use crate::core::sync::handle::{handle_table, Handle, HandleKind};
use parking_lot::{Condvar, Mutex};
use std::time::Duration;
use tracing::trace;

/// Waitable event with auto- or manual-reset semantics
pub struct Event {
    signaled: Mutex<bool>,
    condvar: Condvar,
    manual_reset: bool,
    handle: Handle,
}

impl Event {
    /// Create an event
    ///
    /// Fails with `CannotCreateEvent` when the handle table is exhausted.
    #[track_caller]
    pub fn new(manual_reset: bool, initial_state: bool) -> SyncResult<Self> {
        let Some(handle) = handle_table().register(HandleKind::Event) else {
            return Err(SyncError::new(
                LockErrorKind::CannotCreateEvent,
                "Cannot create synchronization event",
            ));
        };

        Ok(Self {
            signaled: Mutex::new(initial_state),
            condvar: Condvar::new(),
            manual_reset,
            handle,
        })
    }

    /// Manual-reset event, initially clear
    #[track_caller]
    pub fn manual() -> SyncResult<Self> {
        Self::new(true, false)
    }

    /// Auto-reset event, initially clear
    #[track_caller]
    pub fn auto() -> SyncResult<Self> {
        Self::new(false, false)
    }

    /// Signal the event
    pub fn set_event(&self) {
        let mut signaled = self.signaled.lock();
        *signaled = true;
        if self.manual_reset {
            self.condvar.notify_all();
        } else {
            self.condvar.notify_one();
        }
        trace!(handle = %self.handle.id(), "event set");
    }

    /// Clear the event
    pub fn clear_event(&self) {
        *self.signaled.lock() = false;
        trace!(handle = %self.handle.id(), "event cleared");
    }

    #[inline]
    pub fn is_signaled(&self) -> bool {
        *self.signaled.lock()
    }

    #[inline]
    pub fn is_manual_reset(&self) -> bool {
        self.manual_reset
    }

    fn wait_raw(&self, timeout: Option<Duration>) -> RawStatus {
        let deadline = Deadline::after(timeout);
        let mut signaled = self.signaled.lock();

        loop {
            if *signaled {
                if !self.manual_reset {
                    *signaled = false;
                }
                return RawStatus::Signaled;
            }

            match deadline.instant() {
                None => self.condvar.wait(&mut signaled),
                Some(at) => {
                    if self.condvar.wait_until(&mut signaled, at).timed_out() {
                        if *signaled {
                            continue;
                        }
                        return RawStatus::TimedOut;
                    }
                }
            }
        }
    }
}

impl Waitable for Event {
    fn wait(&self, timeout: Option<Duration>) -> WaitOutcome {
        self.wait_raw(timeout).into()
    }

    fn name(&self) -> &'static str {
        "event"
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("handle", &self.handle.id())
            .field("manual_reset", &self.manual_reset)
            .field("signaled", &self.is_signaled())
            .finish()
    }
}
