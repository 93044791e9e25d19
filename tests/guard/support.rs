/*!
 * Shared test doubles for guard tests
 */

use mockall::mock;
use parking_lot::Mutex;
use std::time::Duration;
use synctl::{LockMode, ReadWriteLock};

mock! {
    pub Lock {}

    impl ReadWriteLock for Lock {
        fn lock_for_read(&self) -> bool;
        fn lock_for_write(&self) -> bool;
        fn try_lock_for_read(&self, timeout: Duration) -> bool;
        fn try_lock_for_write(&self, timeout: Duration) -> bool;
        fn unlock_mode(&self, mode: LockMode);
        fn unlock(&self);
        fn name(&self) -> &'static str;
    }
}

/// Mock lock that names itself and accepts any number of name queries
pub fn named_mock() -> MockLock {
    let mut lock = MockLock::new();
    lock.expect_name().return_const("mock");
    lock
}

/// Lock that grants every request and records the calls it receives
pub struct RecordingLock {
    name: &'static str,
    grant_read: bool,
    log: Mutex<Vec<String>>,
}

impl RecordingLock {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            grant_read: true,
            log: Mutex::new(Vec::new()),
        }
    }

    /// Refuse every shared acquisition
    pub fn refusing_reads(name: &'static str) -> Self {
        Self {
            grant_read: false,
            ..Self::new(name)
        }
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().clone()
    }

    fn record(&self, entry: &str) {
        self.log.lock().push(entry.to_string());
    }
}

impl ReadWriteLock for RecordingLock {
    fn lock_for_read(&self) -> bool {
        self.record("read");
        self.grant_read
    }

    fn lock_for_write(&self) -> bool {
        self.record("write");
        true
    }

    fn try_lock_for_read(&self, _timeout: Duration) -> bool {
        self.record("try_read");
        self.grant_read
    }

    fn try_lock_for_write(&self, _timeout: Duration) -> bool {
        self.record("try_write");
        true
    }

    fn unlock_mode(&self, mode: LockMode) {
        match mode {
            LockMode::Shared => self.record("unlock(read)"),
            LockMode::Exclusive => self.record("unlock(write)"),
        }
    }

    fn unlock(&self) {
        self.record("unlock");
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
