/*!
 * Waitable Object Traits
 *
 * Core abstractions for objects a thread can block on.
 *
 * # Design: Outcomes as Values
 *
 * A wait never raises. Every primitive-specific status is mapped to the
 * closed `WaitOutcome` vocabulary so callers branch on timeout and
 * abandonment without caring which primitive sits underneath.
 */

use crate::core::errors::WaitOutcome;
use crate::core::limits::timeout_from_millis;
use std::time::Duration;

/// Status reported by the underlying primitive for one wait attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawStatus {
    /// Object was signaled or acquired
    Signaled,
    /// Deadline passed first
    TimedOut,
    /// Acquired from an owner that terminated while holding it
    OwnerDied,
    /// Primitive refused the operation (e.g. release by a non-owner)
    Refused,
}

impl From<RawStatus> for WaitOutcome {
    #[inline]
    fn from(status: RawStatus) -> Self {
        match status {
            RawStatus::Signaled => WaitOutcome::Ok,
            RawStatus::TimedOut => WaitOutcome::Timeout,
            RawStatus::OwnerDied => WaitOutcome::Abandoned,
            RawStatus::Refused => WaitOutcome::Failed,
        }
    }
}

/// Object a thread can block on until it is signaled
///
/// Implementations must be:
/// - **Thread-safe**: waited on from any number of threads
/// - **Non-raising**: every status becomes a [`WaitOutcome`]
pub trait Waitable: Send + Sync {
    /// Block until signaled or `timeout` elapses; `None` waits forever
    fn wait(&self, timeout: Option<Duration>) -> WaitOutcome;

    /// Wait with a raw millisecond timeout
    ///
    /// [`WAIT_INFINITE_MS`](crate::core::limits::WAIT_INFINITE_MS) waits forever.
    fn wait_millis(&self, timeout_millis: u32) -> WaitOutcome {
        self.wait(timeout_from_millis(timeout_millis))
    }

    /// Object kind name for logging
    fn name(&self) -> &'static str;
}

/// Waitable object whose successful wait must be paired with a release
pub trait Releasable: Waitable {
    /// Give up one successful wait
    ///
    /// Returns `WaitOutcome::Failed` when the caller does not hold the object.
    fn release(&self) -> WaitOutcome;
}
