/*!
 * Wait Queue
 * FIFO container of waiter handles
 *
 * Arrival order equals release order. The queue has no internal locking:
 * every access is serialized externally by the semaphore's guard.
 */

use crate::handle::WaiterHandle;
use std::collections::VecDeque;

/// Ordered sequence of blocked waiters.
///
/// Removal happens only from the front, insertion only at the back. A
/// handle appears in the queue at most once.
#[derive(Debug, Default)]
pub struct WaitQueue {
    elements: VecDeque<WaiterHandle>,
}

impl WaitQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            elements: VecDeque::new(),
        }
    }

    /// Append a waiter at the back of the queue.
    #[inline]
    pub fn push_back(&mut self, handle: WaiterHandle) {
        self.elements.push_back(handle);
    }

    /// Remove and return the oldest waiter, or `None` if the queue is
    /// empty.
    #[inline]
    pub fn pop_front(&mut self) -> Option<WaiterHandle> {
        self.elements.pop_front()
    }

    /// Check whether any waiters are queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of queued waiters.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }
}
