/*!
 * System Limits and Constants
 *
 * Centralized location for synchronization limits, thresholds, and magic numbers.
 * Values shared with the wire-level error vocabulary are marked [COMPAT].
 */

use std::time::Duration;

// =============================================================================
// ERROR CODES
// =============================================================================

/// First synchronization error code
/// [COMPAT] Error codes are numbered in blocks of 1000 per subsystem
pub const SYNCHRONIZATION_ERROR_BASE: u32 = 6000;

// =============================================================================
// WAIT LIMITS
// =============================================================================

/// Millisecond sentinel meaning "wait forever"
/// [COMPAT] Matches the signed 32-bit maximum used by callers passing raw millis
pub const WAIT_INFINITE_MS: u32 = i32::MAX as u32;

/// Upper bound on one sleep between try-acquire attempts (1s)
/// Emulated timed acquisition never sleeps longer than this or the remaining budget
pub const DEFAULT_POLL_INTERVAL_CAP: Duration = Duration::from_secs(1);

/// How often a blocked mutex waiter re-checks whether the owner thread died
/// A terminated owner cannot signal, so waiters poll for abandonment
pub const ABANDONMENT_CHECK_INTERVAL: Duration = Duration::from_millis(10);

// =============================================================================
// HANDLE LIMITS
// =============================================================================

/// Default capacity of the process handle table
/// Creating a waitable object or lock beyond this fails with a create error
pub const DEFAULT_MAX_SYNC_HANDLES: usize = 16 * 1024 * 1024;

/// Converts a raw millisecond timeout into the optional duration used by waits
///
/// [`WAIT_INFINITE_MS`] maps to `None` (no timeout).
#[inline]
pub const fn timeout_from_millis(millis: u32) -> Option<Duration> {
    if millis >= WAIT_INFINITE_MS {
        None
    } else {
        Some(Duration::from_millis(millis as u64))
    }
}
