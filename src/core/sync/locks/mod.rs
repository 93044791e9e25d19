/*!
 * Read-Write Locks
 *
 * Backends behind the `ReadWriteLock` trait:
 * - `SlimReadWriteLock` (try-acquire primitive, polled timed acquire)
 * - `ToolkitReadWriteLock` (native timed acquire, recursion mode)
 */

mod hold;
mod slim;
mod toolkit;
mod traits;

// Re-export public API
pub use slim::SlimReadWriteLock;
pub use toolkit::ToolkitReadWriteLock;
pub use traits::{LockMode, ReadWriteLock};
