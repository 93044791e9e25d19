/*!
 * Synchronizer Tests
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use synctl::{
    Event, Guard, LockErrorKind, Mutex, Releasable, Synchronizer, WaitOutcome, Waitable,
};

/// Releasable whose release always fails
struct StubbornObject {
    releases: AtomicUsize,
}

impl Waitable for StubbornObject {
    fn wait(&self, _timeout: Option<Duration>) -> WaitOutcome {
        WaitOutcome::Ok
    }

    fn name(&self) -> &'static str {
        "stubborn"
    }
}

impl Releasable for StubbornObject {
    fn release(&self) -> WaitOutcome {
        self.releases.fetch_add(1, Ordering::SeqCst);
        WaitOutcome::Failed
    }
}

#[test]
fn test_missing_object_is_missing_lock() {
    let err = Synchronizer::<Mutex>::new(None).unwrap_err();
    assert_eq!(err.kind(), LockErrorKind::MissingLock);
    assert_eq!(err.code(), 6006);
    assert!(err.location().file().ends_with("synchronizer_tests.rs"));
}

#[test]
fn test_recursive_synchronizers_on_one_mutex() {
    let mutex = Mutex::new().unwrap();
    {
        let _outer = Synchronizer::acquire(&mutex).unwrap();
        let inner = Synchronizer::acquire(&mutex).unwrap();
        assert_eq!(mutex.held_depth(), 2);
        drop(inner);
        assert_eq!(mutex.held_depth(), 1);
    }
    assert!(!mutex.is_owned());
}

#[test]
fn test_failed_release_is_not_raised() {
    let object = StubbornObject {
        releases: AtomicUsize::new(0),
    };
    {
        let guard = Synchronizer::acquire(&object).unwrap();
        assert!(guard.is_held());
        assert_eq!(guard.resource_type(), "stubborn");
    }
    assert_eq!(object.releases.load(Ordering::SeqCst), 1);
}

#[test]
fn test_event_waits_without_release_trait() {
    // Events are waited on directly; only releasable objects take a Synchronizer
    let event = Event::new(true, true).unwrap();
    assert_eq!(event.wait(None), WaitOutcome::Ok);
    assert!(event.is_signaled());
}
