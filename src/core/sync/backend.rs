/*!
 * Synchronization Backend
 *
 * Factory for locks and waitable objects, chosen once from `SyncConfig`.
 *
 * # Design: Runtime Selection
 *
 * The backend is resolved at process start and injected wherever locks are
 * built. Callers receive `Box<dyn ReadWriteLock>` and never name a concrete
 * backend type.
 */

use super::config::{RecursionMode, RwBackendKind, SyncConfig};
use super::handle::handle_table;
use super::locks::{ReadWriteLock, SlimReadWriteLock, ToolkitReadWriteLock};
use super::wait::{Event, Mutex};
use crate::core::errors::{LockErrorKind, SyncError, SyncResult};
use std::time::Duration;
use tracing::{info, warn};

/// Lock and waitable factory
#[derive(Debug, Clone)]
pub struct SyncBackend {
    kind: RwBackendKind,
    recursion: RecursionMode,
    poll_interval_cap: Duration,
}

impl SyncBackend {
    /// Resolve the configured backend and apply the handle table capacity
    #[track_caller]
    pub fn from_config(config: &SyncConfig) -> SyncResult<Self> {
        let kind = config.select_backend();
        if kind == RwBackendKind::Posix {
            warn!("POSIX read-write lock backend requested but not available");
            return Err(SyncError::new(
                LockErrorKind::CannotCreateLock,
                "POSIX read-write lock backend is not available",
            ));
        }

        handle_table().set_capacity(config.max_handles);

        info!(
            backend = ?kind,
            recursion = ?config.recursion,
            poll_cap_ms = config.poll_interval_cap.as_millis() as u64,
            max_handles = config.max_handles,
            "Synchronization backend selected"
        );

        Ok(Self {
            kind,
            recursion: config.recursion,
            poll_interval_cap: config.poll_interval_cap,
        })
    }

    /// Build a read-write lock of the selected kind
    #[track_caller]
    pub fn create_rw_lock(&self) -> SyncResult<Box<dyn ReadWriteLock>> {
        match self.kind {
            RwBackendKind::Slim => Ok(Box::new(SlimReadWriteLock::with_poll_cap(
                self.poll_interval_cap,
            )?)),
            // `from_config` never stores Auto or Posix
            _ => Ok(Box::new(ToolkitReadWriteLock::new(self.recursion)?)),
        }
    }

    #[track_caller]
    pub fn create_event(&self, manual_reset: bool, initial_state: bool) -> SyncResult<Event> {
        Event::new(manual_reset, initial_state)
    }

    #[track_caller]
    pub fn create_mutex(&self) -> SyncResult<Mutex> {
        Mutex::new()
    }

    #[inline]
    pub fn kind(&self) -> RwBackendKind {
        self.kind
    }

    #[inline]
    pub fn recursion(&self) -> RecursionMode {
        self.recursion
    }

    /// Name of the read-write lock backend
    pub fn name(&self) -> &'static str {
        match self.kind {
            RwBackendKind::Slim => "slim",
            RwBackendKind::Toolkit => "toolkit",
            RwBackendKind::Posix => "posix",
            RwBackendKind::Auto => "auto",
        }
    }
}
