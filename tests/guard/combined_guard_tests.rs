/*!
 * Combined Read-Write Guard Tests
 */

use super::support::{named_mock, MockLock, RecordingLock};
use mockall::predicate::eq;
use mockall::Sequence;
use pretty_assertions::assert_eq;
use synctl::{LockErrorKind, LockMode, ReadWriteSynchronizer, Stage, ToolkitReadWriteLock};

#[test]
fn test_order_log() {
    let lock = RecordingLock::new("recording-combined");
    {
        let guard = ReadWriteSynchronizer::new(Some(&lock)).unwrap();
        assert_eq!(guard.stage(), Stage::ExclusiveShared);
    }
    assert_eq!(
        lock.log(),
        vec!["write", "read", "unlock(read)", "unlock(write)"]
    );
}

#[test]
fn test_shared_failure_releases_exclusive_once() {
    let lock = RecordingLock::refusing_reads("recording-partial");
    let err = ReadWriteSynchronizer::new(Some(&lock)).unwrap_err();
    assert_eq!(err.kind(), LockErrorKind::CannotAcquireRead);
    assert_eq!(lock.log(), vec!["write", "read", "unlock(write)"]);
}

#[test]
fn test_exclusive_failure_holds_nothing() {
    let mut lock = named_mock();
    lock.expect_lock_for_write().times(1).return_const(false);
    lock.expect_lock_for_read().never();
    lock.expect_unlock_mode().never();

    let err = ReadWriteSynchronizer::new(Some(&lock)).unwrap_err();
    assert_eq!(err.kind(), LockErrorKind::CannotAcquireWrite);
}

#[test]
fn test_release_order_with_mock() {
    let mut seq = Sequence::new();
    let mut lock = named_mock();
    lock.expect_lock_for_write()
        .times(1)
        .in_sequence(&mut seq)
        .return_const(true);
    lock.expect_lock_for_read()
        .times(1)
        .in_sequence(&mut seq)
        .return_const(true);
    lock.expect_unlock_mode()
        .with(eq(LockMode::Shared))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    lock.expect_unlock_mode()
        .with(eq(LockMode::Exclusive))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());

    drop(ReadWriteSynchronizer::new(Some(&lock)).unwrap());
}

#[test]
fn test_none_lock_is_empty() {
    let guard = ReadWriteSynchronizer::<MockLock>::new(None).unwrap();
    assert_eq!(guard.stage(), Stage::Empty);
}

#[test]
fn test_real_recursive_lock() {
    let lock = ToolkitReadWriteLock::recursive().unwrap();
    drop(ReadWriteSynchronizer::new(Some(&lock)).unwrap());
    assert!(!lock.is_locked_exclusive());
    assert_eq!(lock.reader_count(), 0);
}
