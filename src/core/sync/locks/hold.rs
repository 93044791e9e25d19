/*!
 * Hold Tracking
 *
 * Atomic record of who holds a raw reader-writer lock and how.
 *
 * # Design: No Shared Mode Field
 *
 * A single "last acquired mode" field on a shared lock instance is written by
 * the acquiring thread and read by whichever thread unlocks next, which races
 * as soon as two threads share the instance. Instead the exclusive holder is
 * identified by its thread token and shared holds are a counter, both updated
 * atomically, so `unlock` can always tell which release primitive applies.
 */

use crate::core::id::ThreadToken;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

const NO_WRITER: u64 = 0;

#[derive(Debug, Default)]
pub(crate) struct HoldState {
    /// Token of the exclusive holder, `NO_WRITER` when none
    writer: AtomicU64,
    /// Exclusive recursion depth; only touched by the writer thread
    write_depth: AtomicUsize,
    /// Number of outstanding shared holds
    readers: AtomicUsize,
}

impl HoldState {
    pub(crate) const fn new() -> Self {
        Self {
            writer: AtomicU64::new(NO_WRITER),
            write_depth: AtomicUsize::new(0),
            readers: AtomicUsize::new(0),
        }
    }

    /// Whether `me` holds the exclusive mode
    #[inline]
    pub(crate) fn is_writer(&self, me: ThreadToken) -> bool {
        self.writer.load(Ordering::Acquire) == me.get()
    }

    /// Record a fresh exclusive acquisition by `me`
    #[inline]
    pub(crate) fn enter_write(&self, me: ThreadToken) {
        self.write_depth.store(1, Ordering::Relaxed);
        self.writer.store(me.get(), Ordering::Release);
    }

    /// Record a nested acquisition by the current writer
    #[inline]
    pub(crate) fn nest_write(&self) {
        self.write_depth.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn write_depth(&self) -> usize {
        self.write_depth.load(Ordering::Relaxed)
    }

    /// Drop one exclusive level held by `me`
    ///
    /// Returns `Some(true)` when the last level was dropped and the raw lock
    /// must be released, `Some(false)` for a nested level, `None` if `me` is
    /// not the writer.
    pub(crate) fn leave_write(&self, me: ThreadToken) -> Option<bool> {
        if !self.is_writer(me) {
            return None;
        }
        let depth = self.write_depth.load(Ordering::Relaxed);
        if depth > 1 {
            self.write_depth.store(depth - 1, Ordering::Relaxed);
            return Some(false);
        }
        self.write_depth.store(0, Ordering::Relaxed);
        self.writer.store(NO_WRITER, Ordering::Release);
        Some(true)
    }

    /// Record a shared acquisition
    #[inline]
    pub(crate) fn enter_read(&self) {
        self.readers.fetch_add(1, Ordering::AcqRel);
    }

    /// Drop one shared hold; `false` if none was outstanding
    pub(crate) fn leave_read(&self) -> bool {
        self.readers
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }

    #[inline]
    pub(crate) fn readers(&self) -> usize {
        self.readers.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn has_writer(&self) -> bool {
        self.writer.load(Ordering::Acquire) != NO_WRITER
    }
}
