//! Cooperative shutdown primitives.
//!
//! Shutdown is a one-way transition: the front-end thread flips the shared
//! [`StopFlag`], then broadcasts every queue condvar so no worker stays
//! parked in a blocking pop. Workers observe the flag once per loop
//! iteration and wind down on their own - there is no preemption.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::queue::WakeAll;

/// Process-wide stop marker. Transitions false -> true exactly once and
/// never back; read lock-free by every worker on every iteration.
pub struct StopFlag {
    flag: AtomicBool,
}

impl Default for StopFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl StopFlag {
    pub fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Set the flag. Returns `true` if this call performed the transition,
    /// `false` if it was already set.
    pub fn set(&self) -> bool {
        !self.flag.swap(true, Ordering::Release)
    }
}

/// Owns the stop flag plus the wakeup list for every work queue.
///
/// Built once at startup; [`ShutdownCoordinator::request_stop`] is called
/// from the front-end thread when the interactive session ends. A second
/// call is a no-op.
pub struct ShutdownCoordinator {
    stop: Arc<StopFlag>,
    queues: Vec<Arc<dyn WakeAll>>,
}

impl ShutdownCoordinator {
    pub fn new(stop: Arc<StopFlag>) -> Self {
        Self {
            stop,
            queues: Vec::new(),
        }
    }

    /// Register a queue whose blocked consumers must be woken on stop.
    pub fn register(&mut self, queue: Arc<dyn WakeAll>) {
        self.queues.push(queue);
    }

    pub fn stop_flag(&self) -> Arc<StopFlag> {
        Arc::clone(&self.stop)
    }

    /// Set the stop flag and broadcast every registered queue.
    ///
    /// The broadcast happens strictly after the flag store, so a consumer
    /// woken here re-checks the flag and cannot miss the shutdown. Idempotent.
    pub fn request_stop(&self) {
        if !self.stop.set() {
            return;
        }
        for queue in &self.queues {
            queue.wake_all();
        }
    }
}
