//! Thread-safe FIFO between pipeline workers.
//!
//! A `WorkQueue` sits between exactly one producer-side and one
//! consumer-side worker: the front-end thread feeds the dispatch worker
//! through one instance, the collection worker feeds the sink worker
//! through another. It is unbounded; back-pressure comes from the device
//! round trip, not from the queue.
//!
//! The two blocking pops encode the two shutdown disciplines the pipeline
//! needs:
//!
//! - [`WorkQueue::pop_wait`] returns `None` as soon as the stop flag is
//!   observed, abandoning whatever is still queued (input side).
//! - [`WorkQueue::pop_drain`] keeps handing out items until the queue is
//!   empty *and* the stop flag is set (result side - nothing collected may
//!   be lost).

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

use crate::stop::StopFlag;

/// Wakeup seam used by the shutdown coordinator.
///
/// Implemented by every queue so the coordinator can broadcast all condvars
/// after setting the stop flag without knowing the item types.
pub trait WakeAll: Send + Sync {
    /// Wake every consumer blocked on this queue.
    fn wake_all(&self);
}

/// Unbounded FIFO with blocking pops tied to a shared [`StopFlag`].
pub struct WorkQueue<T> {
    /// Queue state, strictly FIFO.
    items: Mutex<VecDeque<T>>,

    /// Signaled on push (one waiter) and on shutdown (all waiters).
    ready: Condvar,
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            ready: Condvar::new(),
        }
    }

    /// Append an item and wake one blocked consumer.
    pub fn push(&self, item: T) {
        let mut items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        items.push_back(item);
        drop(items);
        self.ready.notify_one();
    }

    /// Number of queued items. Advisory only; stale the moment it returns.
    pub fn len(&self) -> usize {
        self.items.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Block until an item arrives or the stop flag is set.
    ///
    /// Stop wins: once `stop` is observed, returns `None` even if items
    /// remain queued. Used by the dispatch worker, which abandons its
    /// backlog on shutdown.
    pub fn pop_wait(&self, stop: &StopFlag) -> Option<T> {
        let mut items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if stop.is_set() {
                return None;
            }
            if let Some(item) = items.pop_front() {
                return Some(item);
            }
            items = self.ready.wait(items).unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Block until an item arrives; after the stop flag is set, keep
    /// returning queued items until the queue is empty, then `None`.
    ///
    /// Used by the sink worker, which must persist every collected result
    /// before exiting.
    pub fn pop_drain(&self, stop: &StopFlag) -> Option<T> {
        let mut items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if let Some(item) = items.pop_front() {
                return Some(item);
            }
            if stop.is_set() {
                return None;
            }
            items = self.ready.wait(items).unwrap_or_else(|e| e.into_inner());
        }
    }
}

impl<T: Send> WakeAll for WorkQueue<T> {
    fn wake_all(&self) {
        self.ready.notify_all();
    }
}
