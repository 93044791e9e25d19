/*!
 * Waitable Objects
 *
 * Kernel-style objects a thread blocks on:
 * - `Event` (auto- or manual-reset signal)
 * - `Mutex` (thread-owned, recursive, abandonment-aware)
 *
 * Every wait returns a `WaitOutcome`; nothing here raises.
 */

mod event;
mod mutex;
mod traits;

// Re-export public API
pub use event::Event;
pub use mutex::Mutex;
pub use traits::{Releasable, Waitable};
