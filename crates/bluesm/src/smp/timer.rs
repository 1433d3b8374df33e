//! Delayed task scheduling for the Security Manager Timer

use log::{error, trace};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Task run once when a timer expires
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Identifies a scheduled task so that it can be cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Schedules cancellable one-shot tasks
pub trait TimerService: Send + Sync {
    /// Run `callback` once after `delay`, unless cancelled first. Returns
    /// `None` if the task could not be scheduled.
    ///
    /// The callback must never run from within `schedule_once` itself.
    fn schedule_once(&self, delay: Duration, callback: TimerCallback) -> Option<TimerHandle>;

    /// Cancel a scheduled task. Cancelling a task that already ran is a no-op.
    fn cancel(&self, handle: TimerHandle);
}

/// `TimerService` that parks one thread per scheduled task
#[derive(Debug, Default)]
pub struct ThreadTimer {
    next_id: AtomicU64,
    pending: Arc<Mutex<HashMap<u64, Sender<()>>>>,
}

impl ThreadTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks that have neither fired nor been cancelled
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}

impl TimerService for ThreadTimer {
    fn schedule_once(&self, delay: Duration, callback: TimerCallback) -> Option<TimerHandle> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        self.pending.lock().insert(id, cancel_tx);

        let pending = Arc::clone(&self.pending);
        let spawned = thread::Builder::new()
            .name(format!("sm-timer-{}", id))
            .spawn(move || match cancel_rx.recv_timeout(delay) {
                Err(RecvTimeoutError::Timeout) => {
                    // A cancel that lost the race has already removed the entry.
                    let armed = pending.lock().remove(&id).is_some();
                    if armed {
                        callback();
                    }
                }
                _ => trace!("sm: timer {} cancelled", id),
            });

        match spawned {
            Ok(_) => Some(TimerHandle(id)),
            Err(e) => {
                error!("sm: Failed to spawn timer thread: {}", e);
                self.pending.lock().remove(&id);
                None
            }
        }
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some(cancel_tx) = self.pending.lock().remove(&handle.0) {
            // The sleeper may have just timed out and dropped its receiver.
            let _ = cancel_tx.send(());
        }
    }
}

impl Drop for ThreadTimer {
    fn drop(&mut self) {
        for (_, cancel_tx) in self.pending.lock().drain() {
            let _ = cancel_tx.send(());
        }
    }
}
