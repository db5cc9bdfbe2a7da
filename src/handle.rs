/*!
 * Waiter Handle
 * One-shot blocked-to-released cell shared between a blocked caller and
 * the semaphore that will wake it
 */

use crate::config::SpinPolicy;
use std::hint;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Per-waiter release flag.
///
/// Created in the blocked state by a caller that is about to block, then
/// shared between exactly two parties: the blocked caller, which only
/// polls it, and the semaphore's `signal`, which writes it exactly once.
/// The transition is terminal - a handle is never reset or re-enqueued.
///
/// The flag itself is atomic because no lock covers the poll: the waker's
/// `Release` store must become visible to the poller's `Acquire` loads on
/// its own.
#[derive(Clone, Debug)]
pub struct WaiterHandle {
    released: Arc<AtomicBool>,
}

impl WaiterHandle {
    /// Create a new handle in the blocked state.
    pub fn new() -> Self {
        Self {
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Mark the waiter as released.
    ///
    /// Called exactly once per handle, by the thread executing `signal`.
    #[inline]
    pub fn release(&self) {
        self.released.store(true, Ordering::Release);
    }

    /// Check whether the waiter has been released.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Busy-poll until the handle is released.
    ///
    /// Burns CPU while blocked; the policy only controls how often the
    /// poller yields to the scheduler between checks.
    pub fn poll_released(&self, policy: &SpinPolicy) {
        let mut spins = 0u32;
        while !self.is_released() {
            if spins >= policy.yield_after {
                spins = 0;
                thread::yield_now();
            } else {
                spins += 1;
                hint::spin_loop();
            }
        }
    }
}

impl Default for WaiterHandle {
    fn default() -> Self {
        Self::new()
    }
}
