//! Dispatch queues — unbounded FIFO hand-off from the engine to consumers.
//!
//! Built on `std::sync::mpsc`.  The producer half ([`Publisher`]) never
//! blocks and never fails.  The consumer half ([`Subscriber`]) is cloneable:
//! clones share one receiver behind a mutex, so several consumer tasks can
//! drain the same queue and each item is delivered to exactly one of them.
//!
//! There is no backpressure.  A stalled consumer lets the queue grow without
//! bound.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};

/// Create a connected publisher/subscriber pair.
pub fn dispatch_queue<T>() -> (Publisher<T>, Subscriber<T>) {
    let (tx, rx) = mpsc::channel();
    (Publisher { tx }, Subscriber { rx: Arc::new(Mutex::new(rx)) })
}

// ── Publisher ─────────────────────────────────────────────────────────────────

/// Producer half.
pub struct Publisher<T> {
    tx: Sender<T>,
}

impl<T> Publisher<T> {
    /// Enqueue `item`.  Items pushed after every subscriber has been dropped
    /// are discarded.
    #[inline]
    pub fn push(&self, item: T) {
        let _ = self.tx.send(item);
    }
}

impl<T> Clone for Publisher<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

// ── Subscriber ────────────────────────────────────────────────────────────────

/// Consumer half.
pub struct Subscriber<T> {
    rx: Arc<Mutex<Receiver<T>>>,
}

impl<T> Subscriber<T> {
    /// Next item in FIFO order, or `None` if the queue is currently empty.
    /// Never blocks waiting for the producer.
    pub fn try_pop(&self) -> Option<T> {
        // A panicking consumer cannot leave the receiver half-updated.
        let rx = self.rx.lock().unwrap_or_else(PoisonError::into_inner);
        rx.try_recv().ok()
    }

    /// Pop until empty and return everything popped, oldest first.
    pub fn drain(&self) -> Vec<T> {
        let rx = self.rx.lock().unwrap_or_else(PoisonError::into_inner);
        rx.try_iter().collect()
    }
}

impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        Self { rx: Arc::clone(&self.rx) }
    }
}
