/*!
 * Deadline Tracking
 *
 * Monotonic timeout bookkeeping shared by every timed wait.
 */

use std::time::{Duration, Instant};

/// A point in time after which a timed operation gives up
///
/// `Deadline::never()` models an infinite wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// Deadline `timeout` from now; `None` never elapses
    #[inline]
    pub fn after(timeout: Option<Duration>) -> Self {
        Self {
            at: timeout.and_then(|t| Instant::now().checked_add(t)),
        }
    }

    /// Deadline that never elapses
    #[inline]
    pub const fn never() -> Self {
        Self { at: None }
    }

    #[inline]
    pub fn is_elapsed(&self) -> bool {
        match self.at {
            Some(at) => Instant::now() >= at,
            None => false,
        }
    }

    /// Time left, `None` if infinite, `Some(ZERO)` once elapsed
    #[inline]
    pub fn remaining(&self) -> Option<Duration> {
        self.at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    #[inline]
    pub fn instant(&self) -> Option<Instant> {
        self.at
    }
}
