/*!
 * synctl
 * Uniform synchronization front-end: read-write locks, waitable objects
 * and scope guards over `parking_lot` primitives
 */

pub mod core;
pub mod monitoring;

// Re-exports
pub use crate::core::*;
pub use monitoring::{init_tracing, span_scenario, ScenarioSpan};
