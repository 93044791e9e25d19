/*!
 * synctl - Demo Entry Point
 *
 * Runs the synchronization scenarios against the configured backend:
 * - Mutex counter: two threads incrementing under `Synchronizer`
 * - Read-write lock: concurrent readers and writers under rw guards
 * - Combined guard on a recursive lock
 *
 * Prints a JSON summary on stdout.
 */

use std::error::Error;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{error, info};

use synctl::{
    init_tracing, span_scenario, Event, ExclusiveLockGuard, LockErrorKind, Mutex, ReadSynchronizer,
    ReadWriteLock, ReadWriteSynchronizer, RecursionMode, SerializableError, SyncBackend,
    SyncConfig, SyncError, Synchronizer, ToolkitReadWriteLock, TryWriteSynchronizer, Waitable,
};

const INCREMENTS_PER_THREAD: usize = 100_000;
const RW_READERS: usize = 4;
const RW_WRITERS: usize = 2;
const RW_ROUNDS: usize = 2_000;

/// Counter whose increments are only ever performed under the mutex
struct GuardedCounter {
    mutex: Mutex,
    value: AtomicUsize,
}

fn mutex_counter(backend: &SyncBackend) -> Result<serde_json::Value, SyncError> {
    let span = span_scenario("mutex_counter");
    let counter = Arc::new(GuardedCounter {
        mutex: backend.create_mutex()?,
        value: AtomicUsize::new(0),
    });

    let workers: Vec<_> = (0..2)
        .map(|_| {
            let counter = counter.clone();
            thread::spawn(move || -> Result<(), SyncError> {
                for _ in 0..INCREMENTS_PER_THREAD {
                    let _guard = Synchronizer::acquire(&counter.mutex)?;
                    // Load and store separately so a missing exclusion shows up as lost updates
                    let current = counter.value.load(Ordering::Relaxed);
                    counter.value.store(current + 1, Ordering::Relaxed);
                }
                Ok(())
            })
        })
        .collect();

    for worker in workers {
        worker
            .join()
            .map_err(|_| SyncError::new(LockErrorKind::OperationCancelled, "worker panicked"))??;
    }

    let total = counter.value.load(Ordering::Relaxed);
    let expected = 2 * INCREMENTS_PER_THREAD;
    let duration_us = span.finish(total == expected);
    info!(total, expected, duration_us, "mutex counter finished");

    Ok(serde_json::json!({
        "total": total,
        "expected": expected,
        "duration_us": duration_us,
    }))
}

fn rw_readers_writers(backend: &SyncBackend) -> Result<serde_json::Value, SyncError> {
    let span = span_scenario("rw_readers_writers");
    let lock: Arc<dyn ReadWriteLock> = Arc::from(backend.create_rw_lock()?);
    let writers_inside = Arc::new(AtomicUsize::new(0));
    let readers_inside = Arc::new(AtomicUsize::new(0));
    let violation = Arc::new(AtomicBool::new(false));
    let timeouts = Arc::new(AtomicUsize::new(0));

    let mut workers = Vec::new();
    for index in 0..RW_READERS + RW_WRITERS {
        let lock = lock.clone();
        let writers_inside = writers_inside.clone();
        let readers_inside = readers_inside.clone();
        let violation = violation.clone();
        let timeouts = timeouts.clone();
        let is_writer = index < RW_WRITERS;

        workers.push(thread::spawn(move || -> Result<(), SyncError> {
            for _ in 0..RW_ROUNDS {
                if is_writer {
                    let guard =
                        match TryWriteSynchronizer::new(Some(&*lock), Duration::from_millis(50)) {
                            Ok(guard) => guard,
                            Err(_) => {
                                timeouts.fetch_add(1, Ordering::Relaxed);
                                continue;
                            }
                        };
                    let writers = writers_inside.fetch_add(1, Ordering::SeqCst) + 1;
                    if writers > 1 || readers_inside.load(Ordering::SeqCst) > 0 {
                        violation.store(true, Ordering::SeqCst);
                    }
                    writers_inside.fetch_sub(1, Ordering::SeqCst);
                    drop(guard);
                } else {
                    let _guard = ReadSynchronizer::new(Some(&*lock))?;
                    readers_inside.fetch_add(1, Ordering::SeqCst);
                    if writers_inside.load(Ordering::SeqCst) > 0 {
                        violation.store(true, Ordering::SeqCst);
                    }
                    readers_inside.fetch_sub(1, Ordering::SeqCst);
                }
            }
            Ok(())
        }));
    }

    for worker in workers {
        worker
            .join()
            .map_err(|_| SyncError::new(LockErrorKind::OperationCancelled, "worker panicked"))??;
    }

    let exclusive_ok = !violation.load(Ordering::SeqCst);
    let duration_us = span.finish(exclusive_ok);
    info!(backend = lock.name(), exclusive_ok, duration_us, "rw scenario finished");

    Ok(serde_json::json!({
        "backend": lock.name(),
        "exclusion_held": exclusive_ok,
        "write_timeouts": timeouts.load(Ordering::Relaxed),
        "duration_us": duration_us,
    }))
}

fn combined_and_events() -> Result<serde_json::Value, SyncError> {
    let span = span_scenario("combined_and_events");

    let lock = ToolkitReadWriteLock::new(RecursionMode::Recursive)?;
    let stage = {
        let guard = ReadWriteSynchronizer::new(Some(&lock))?;
        guard.stage()
    };
    {
        let _strict = ExclusiveLockGuard::new(Some(&lock))?;
    }

    let ready = Arc::new(Event::manual()?);
    let signaller = {
        let ready = ready.clone();
        thread::spawn(move || ready.set_event())
    };
    let outcome = ready.wait(Some(Duration::from_secs(5)));
    signaller
        .join()
        .map_err(|_| SyncError::new(LockErrorKind::OperationCancelled, "signaller panicked"))?;

    span.finish(outcome.is_acquired());
    Ok(serde_json::json!({
        "combined_stage": stage,
        "event_outcome": outcome,
    }))
}

fn run() -> Result<serde_json::Value, SyncError> {
    let config = SyncConfig::from_env();
    let backend = SyncBackend::from_config(&config)?;
    info!(backend = backend.name(), "synctl demo starting");

    Ok(serde_json::json!({
        "config": config,
        "mutex_counter": mutex_counter(&backend)?,
        "rw_readers_writers": rw_readers_writers(&backend)?,
        "combined_and_events": combined_and_events()?,
    }))
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    match run() {
        Ok(summary) => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Err(err) => {
            error!(error = %err, code = err.code(), "synctl demo failed");
            let report = SerializableError::from(&err);
            eprintln!("{:?}", miette::Report::new(err));
            println!("{}", serde_json::to_string_pretty(&report)?);
            std::process::exit(1);
        }
    }
}
