/*!
 * Read/Write Guard Tests
 */

use super::support::{named_mock, MockLock, RecordingLock};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use std::time::Duration;
use synctl::{
    LockErrorKind, LockMode, ReadSynchronizer, TryReadSynchronizer, TryWriteSynchronizer,
    WriteSynchronizer,
};

#[test]
fn test_none_lock_guards_do_nothing() {
    let guard = WriteSynchronizer::<MockLock>::new(None).unwrap();
    assert!(!guard.is_held());
    let guard = TryReadSynchronizer::<MockLock>::new(None, Duration::from_secs(1)).unwrap();
    assert!(!guard.is_held());
}

#[test]
fn test_write_guard_unlocks_exclusive_once() {
    let mut lock = named_mock();
    lock.expect_lock_for_write().times(1).return_const(true);
    lock.expect_unlock_mode()
        .with(eq(LockMode::Exclusive))
        .times(1)
        .return_const(());
    lock.expect_unlock().never();

    let guard = WriteSynchronizer::new(Some(&lock)).unwrap();
    assert_eq!(guard.mode(), LockMode::Exclusive);
    drop(guard);
}

#[test]
fn test_read_guard_unlocks_shared_once() {
    let mut lock = named_mock();
    lock.expect_lock_for_read().times(1).return_const(true);
    lock.expect_unlock_mode()
        .with(eq(LockMode::Shared))
        .times(1)
        .return_const(());

    drop(ReadSynchronizer::new(Some(&lock)).unwrap());
}

#[test]
fn test_failed_acquire_never_unlocks() {
    let mut lock = named_mock();
    lock.expect_try_lock_for_write()
        .with(eq(Duration::from_millis(25)))
        .times(1)
        .return_const(false);
    lock.expect_lock_for_read().times(1).return_const(false);
    lock.expect_unlock_mode().never();

    let err = TryWriteSynchronizer::new(Some(&lock), Duration::from_millis(25)).unwrap_err();
    assert_eq!(err.kind(), LockErrorKind::CannotAcquireWrite);
    let err = ReadSynchronizer::new(Some(&lock)).unwrap_err();
    assert_eq!(err.kind(), LockErrorKind::CannotAcquireRead);
}

#[test]
fn test_nested_guards_release_own_modes() {
    let lock = RecordingLock::new("recording-rw");
    {
        let _write = WriteSynchronizer::new(Some(&lock)).unwrap();
        let _read = TryReadSynchronizer::new(Some(&lock), Duration::ZERO).unwrap();
    }
    assert_eq!(
        lock.log(),
        vec!["write", "try_read", "unlock(read)", "unlock(write)"]
    );
}
