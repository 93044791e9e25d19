/*!
 * Guard Traits
 *
 * Common queries shared by every scope guard
 */

use super::GuardMetadata;

/// Core guard trait
///
/// Guards have no manual release: dropping the guard is the release.
pub trait Guard {
    /// Resource type name for logging/debugging
    fn resource_type(&self) -> &'static str;

    /// Get guard metadata
    fn metadata(&self) -> &GuardMetadata;

    /// Whether this guard currently holds anything it will release on drop
    fn is_held(&self) -> bool;
}
