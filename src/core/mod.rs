/*!
 * Core Module
 * Synchronization types, guards and error handling
 */

pub mod errors;
pub mod guard;
pub mod id;
pub mod limits;
pub mod sync;

// Re-export for convenience
pub use errors::*;
pub use guard::{
    reset_observer, set_observer, ExclusiveLockGuard, Guard, GuardMetadata, LockGuard,
    ReadSynchronizer, ReadWriteSynchronizer, SharedLockGuard, SpinSynchronizer, Stage,
    SyncObserver, Synchronizer, TracingObserver, TryReadSynchronizer, TryWriteSynchronizer,
    WriteSynchronizer,
};
pub use id::{HandleId, ThreadToken};
pub use limits::*;
pub use sync::{
    Event, LockMode, Mutex, ReadWriteLock, RecursionMode, Releasable, RwBackendKind,
    SlimReadWriteLock, SyncBackend, SyncConfig, ToolkitReadWriteLock, Waitable,
};
