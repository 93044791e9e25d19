/*!
 * Parametrized Lock Guard Tests
 */

use super::support::{named_mock, MockLock, RecordingLock};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use synctl::{ExclusiveLockGuard, LockErrorKind, LockGuard, LockMode, SharedLockGuard};

#[test]
fn test_strict_guard_rejects_none() {
    let err = LockGuard::<MockLock, true>::new(None).unwrap_err();
    assert_eq!(err.kind(), LockErrorKind::MissingLock);
    let err = SharedLockGuard::<MockLock>::new(None).unwrap_err();
    assert_eq!(err.kind(), LockErrorKind::MissingLock);
}

#[test]
fn test_mode_constant() {
    assert_eq!(ExclusiveLockGuard::<MockLock>::MODE, LockMode::Exclusive);
    assert_eq!(SharedLockGuard::<MockLock>::MODE, LockMode::Shared);
}

#[test]
fn test_exclusive_guard_single_release() {
    let mut lock = named_mock();
    lock.expect_lock_for_write().times(1).return_const(true);
    lock.expect_unlock_mode()
        .with(eq(LockMode::Exclusive))
        .times(1)
        .return_const(());

    let guard = ExclusiveLockGuard::new(Some(&lock)).unwrap();
    assert_eq!(guard.mode(), LockMode::Exclusive);
}

#[test]
fn test_refused_shared_maps_to_read_error() {
    let lock = RecordingLock::refusing_reads("recording-strict");
    let err = SharedLockGuard::new(Some(&lock)).unwrap_err();
    assert_eq!(err.kind(), LockErrorKind::CannotAcquireRead);
    assert_eq!(lock.log(), vec!["read"]);
}
