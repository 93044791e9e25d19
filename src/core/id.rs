/*!
 * ID Generation System
 * Type-safe thread and handle identities used for ownership tracking
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

// ============================================================================
// Type-Safe ID Wrappers
// ============================================================================

/// Identity of a thread, stable for the thread's lifetime and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadToken(NonZeroU64);

/// Identity of a registered synchronization handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandleId(pub u64);

impl fmt::Display for ThreadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static NEXT_THREAD_TOKEN: AtomicU64 = AtomicU64::new(1);

fn next_token() -> ThreadToken {
    let raw = NEXT_THREAD_TOKEN.fetch_add(1, Ordering::Relaxed);
    // Counter starts at 1 and a u64 cannot wrap in practice
    ThreadToken(NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN))
}

/// Per-thread identity record; marks the thread dead when its TLS is torn down
struct ThreadIdentity {
    token: ThreadToken,
    alive: Arc<AtomicBool>,
}

impl ThreadIdentity {
    fn new() -> Self {
        Self {
            token: next_token(),
            alive: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl Drop for ThreadIdentity {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
    }
}

thread_local! {
    static CURRENT: ThreadIdentity = ThreadIdentity::new();
}

impl ThreadToken {
    /// Token of the calling thread
    ///
    /// During thread teardown a fresh detached token is returned.
    #[inline]
    pub fn current() -> Self {
        CURRENT.try_with(|id| id.token).unwrap_or_else(|_| next_token())
    }

    /// Raw value, never zero
    #[inline]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

/// Owner of a thread-affine resource, able to tell whether the owner still runs
///
/// Used to detect abandonment: a mutex whose owner record reports
/// `!is_alive()` was left held by a terminated thread.
#[derive(Debug, Clone)]
pub struct OwnerRecord {
    token: ThreadToken,
    alive: Arc<AtomicBool>,
}

impl OwnerRecord {
    /// Record for the calling thread
    pub fn current() -> Self {
        CURRENT
            .try_with(|id| Self {
                token: id.token,
                alive: id.alive.clone(),
            })
            .unwrap_or_else(|_| Self {
                token: next_token(),
                alive: Arc::new(AtomicBool::new(false)),
            })
    }

    #[inline]
    pub fn token(&self) -> ThreadToken {
        self.token
    }

    /// Whether the owning thread has not terminated yet
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Whether this record belongs to the calling thread
    #[inline]
    pub fn is_current(&self) -> bool {
        self.token == ThreadToken::current()
    }
}
