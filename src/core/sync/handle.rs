/*!
 * Handle Table
 *
 * Process-wide registry of live synchronization handles.
 *
 * Every waitable object and read-write lock registers one handle on
 * construction and returns it exactly once on drop. The table has a fixed
 * capacity; registration beyond it is the resource-exhaustion failure that
 * object constructors surface as a create error.
 */

use crate::core::id::HandleId;
use crate::core::limits::DEFAULT_MAX_SYNC_HANDLES;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tracing::trace;

/// Kind of object a handle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleKind {
    Event,
    Mutex,
    RwLock,
}

/// Registry of live handles with a capacity limit
pub struct HandleTable {
    live: AtomicUsize,
    capacity: AtomicUsize,
    next_id: AtomicU64,
}

static GLOBAL_TABLE: HandleTable = HandleTable::new(DEFAULT_MAX_SYNC_HANDLES);

/// The process handle table
#[inline]
pub fn handle_table() -> &'static HandleTable {
    &GLOBAL_TABLE
}

impl HandleTable {
    /// Create a table holding at most `capacity` live handles
    pub const fn new(capacity: usize) -> Self {
        Self {
            live: AtomicUsize::new(0),
            capacity: AtomicUsize::new(capacity),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a new handle, or `None` when the table is full
    pub fn register(&'static self, kind: HandleKind) -> Option<Handle> {
        let capacity = self.capacity.load(Ordering::Acquire);
        self.live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| {
                (live < capacity).then_some(live + 1)
            })
            .ok()?;

        let id = HandleId(self.next_id.fetch_add(1, Ordering::Relaxed));
        trace!(handle = %id, ?kind, "handle opened");
        Some(Handle {
            id,
            kind,
            table: self,
        })
    }

    /// Number of currently registered handles
    #[inline]
    pub fn live(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Acquire)
    }

    /// Change the capacity; existing handles stay valid even above it
    pub fn set_capacity(&self, capacity: usize) {
        self.capacity.store(capacity, Ordering::Release);
    }
}

/// A registered handle, returned to its table on drop
#[derive(Debug)]
pub struct Handle {
    id: HandleId,
    kind: HandleKind,
    table: &'static HandleTable,
}

impl Handle {
    #[inline]
    pub fn id(&self) -> HandleId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> HandleKind {
        self.kind
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.table.live.fetch_sub(1, Ordering::AcqRel);
        trace!(handle = %self.id, kind = ?self.kind, "handle closed");
    }
}

impl std::fmt::Debug for HandleTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandleTable")
            .field("live", &self.live())
            .field("capacity", &self.capacity())
            .finish()
    }
}
