/*!
 * Observer Hook Tests
 *
 * Other tests in this binary run concurrently and also notify the hook, so
 * the recording observer only counts resources named "observed".
 */

use super::support::RecordingLock;
use parking_lot::Mutex as StateLock;
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::sync::Arc;
use std::time::Duration;
use synctl::{
    reset_observer, set_observer, LockMode, Releasable, SyncObserver, Synchronizer,
    TryWriteSynchronizer, WaitOutcome, Waitable, WriteSynchronizer,
};

#[derive(Default)]
struct RecordingObserver {
    events: StateLock<Vec<String>>,
}

impl RecordingObserver {
    fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }
}

impl SyncObserver for RecordingObserver {
    fn on_acquired(&self, resource: &'static str, mode: LockMode) {
        if resource == "observed" {
            self.events.lock().push(format!("acquired {}", mode));
        }
    }

    fn on_released(&self, resource: &'static str, mode: LockMode) {
        if resource == "observed" {
            self.events.lock().push(format!("released {}", mode));
        }
    }

    fn on_release_failed(&self, resource: &'static str, outcome: WaitOutcome) {
        if resource == "observed" {
            self.events.lock().push(format!("release failed {}", outcome));
        }
    }
}

struct FailingRelease;

impl Waitable for FailingRelease {
    fn wait(&self, _timeout: Option<Duration>) -> WaitOutcome {
        WaitOutcome::Ok
    }

    fn name(&self) -> &'static str {
        "observed"
    }
}

impl Releasable for FailingRelease {
    fn release(&self) -> WaitOutcome {
        WaitOutcome::Failed
    }
}

#[test]
#[serial]
fn test_guard_lifecycle_reaches_observer() {
    let observer = Arc::new(RecordingObserver::default());
    set_observer(observer.clone());

    let lock = RecordingLock::new("observed");
    drop(WriteSynchronizer::new(Some(&lock)).unwrap());
    drop(TryWriteSynchronizer::new(Some(&lock), Duration::ZERO).unwrap());

    reset_observer();
    assert_eq!(
        observer.events(),
        vec![
            "acquired exclusive",
            "released exclusive",
            "acquired exclusive",
            "released exclusive",
        ]
    );
}

#[test]
#[serial]
fn test_release_failure_reported_once() {
    let observer = Arc::new(RecordingObserver::default());
    set_observer(observer.clone());

    drop(Synchronizer::acquire(&FailingRelease).unwrap());

    reset_observer();
    assert_eq!(
        observer.events(),
        vec!["acquired exclusive", "release failed failed"]
    );
}
