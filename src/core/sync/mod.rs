/*!
 * Synchronization Primitives
 *
 * Uniform front-end over heterogeneous lock and wait primitives:
 * - Waitable objects (events, mutexes) returning a `WaitOutcome`
 * - Read-write locks with blocking and timed acquisition
 * - A backend factory selected once from `SyncConfig`
 *
 * # Architecture
 *
 * Every object registers one handle in the process handle table, so object
 * creation can fail with a create error when the table is exhausted. Timed
 * operations share a monotonic `Deadline`.
 */

mod backend;
mod config;
mod deadline;
mod handle;
pub mod locks;
pub mod wait;

pub use backend::SyncBackend;
pub use config::{RecursionMode, RwBackendKind, SyncConfig};
pub use deadline::Deadline;
pub use handle::{handle_table, Handle, HandleKind, HandleTable};
pub use locks::{LockMode, ReadWriteLock, SlimReadWriteLock, ToolkitReadWriteLock};
pub use wait::{Event, Mutex, Releasable, Waitable};
