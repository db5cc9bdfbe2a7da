/*!
 * Counting Semaphore
 * FIFO-fair counting semaphore over a spin guard and a wait queue
 *
 * # Architecture
 *
 * A signed counter and a wait queue live behind a single [`SpinLock`] so
 * they always mutate as a unit. `wait` decrements the counter and, when it
 * goes negative, enqueues a one-shot [`WaiterHandle`] and busy-polls it
 * outside the guard. `signal` increments the counter and, while waiters
 * remain, releases exactly the oldest handle. Whenever the guard is free
 * and the counter is negative, `-counter` equals the queue length.
 */

use crate::config::SpinPolicy;
use crate::handle::WaiterHandle;
use crate::queue::WaitQueue;
use crate::spin::SpinLock;
use log::trace;
use thiserror::Error;

/// Error returned by [`Semaphore::try_wait`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryWaitError {
    #[error("no units available")]
    WouldBlock,
}

/// Counter and queue, guarded as a unit.
struct SemState {
    /// Positive: units immediately available. Negative: `-counter`
    /// threads are currently blocked.
    counter: isize,
    queue: WaitQueue,
}

/// Counting semaphore with strict FIFO wakeup order.
///
/// Up to the initial count of threads get past [`wait`](Self::wait)
/// without blocking; further callers block until a holder calls
/// [`signal`](Self::signal). Blocked callers are woken in exactly their
/// arrival order, one per signal.
///
/// Blocking is busy-polling: a blocked thread consumes CPU until its
/// handle is released. See [`SpinPolicy`] for tuning how often it yields.
///
/// # Examples
///
/// ```
/// use fifo_semaphore::Semaphore;
/// use std::sync::Arc;
/// use std::thread;
///
/// let sem = Arc::new(Semaphore::new(1));
///
/// sem.wait(); // fast path, one unit consumed
///
/// let sem2 = sem.clone();
/// let blocked = thread::spawn(move || {
///     sem2.wait(); // blocks until the signal below
///     sem2.signal();
/// });
///
/// sem.signal(); // wakes the blocked thread
/// blocked.join().unwrap();
/// ```
pub struct Semaphore {
    state: SpinLock<SemState>,
    poll_policy: SpinPolicy,
}

impl Semaphore {
    /// Create a semaphore admitting `initial` concurrent holders.
    ///
    /// `initial` may be zero, in which case the first `wait` blocks until
    /// somebody signals.
    ///
    /// # Panics
    ///
    /// Panics if `initial` exceeds `isize::MAX`: the counter is signed so
    /// it can go negative while waiters are queued, and a count that does
    /// not fit would corrupt it.
    pub fn new(initial: usize) -> Self {
        Self::with_policy(initial, SpinPolicy::default())
    }

    /// Create a semaphore with an explicit spin policy for both the guard
    /// and the waiter poll loops.
    ///
    /// # Panics
    ///
    /// Panics if `initial` exceeds `isize::MAX`, like [`new`](Self::new).
    pub fn with_policy(initial: usize, policy: SpinPolicy) -> Self {
        let counter = isize::try_from(initial)
            .unwrap_or_else(|_| panic!("initial count {} exceeds isize::MAX", initial));
        Self {
            state: SpinLock::with_policy(
                SemState {
                    counter,
                    queue: WaitQueue::new(),
                },
                policy,
            ),
            poll_policy: policy,
        }
    }

    /// Consume one unit, blocking until one is available.
    ///
    /// Blocks indefinitely if no matching `signal` ever arrives - there is
    /// no timeout and a pending wait cannot be cancelled.
    pub fn wait(&self) {
        let mut state = self.state.lock();
        state.counter -= 1;
        if state.counter >= 0 {
            // Fast path: unit was available, guard drops here
            return;
        }

        // This caller is now the newest of `-counter` blocked threads.
        // The handle must be queued before the guard is released so a
        // concurrent signal can find it.
        let handle = WaiterHandle::new();
        state.queue.push_back(handle.clone());
        trace!("wait: enqueued waiter, {} now blocked", state.queue.len());
        drop(state);

        // Poll outside the guard so signalers can get in.
        handle.poll_released(&self.poll_policy);
    }

    /// Return one unit, waking the oldest blocked waiter if any.
    ///
    /// Never blocks. Signaling more times than there are outstanding
    /// waits is accepted and simply raises the counter past the original
    /// capacity - the semaphore imposes no ceiling.
    pub fn signal(&self) {
        let mut state = self.state.lock();
        state.counter += 1;
        if state.counter <= 0 {
            // Still at least one waiter queued; hand the unit straight
            // to the oldest one.
            let waiter = match state.queue.pop_front() {
                Some(waiter) => waiter,
                None => panic!(
                    "semaphore invariant violated: counter {} with empty wait queue",
                    state.counter
                ),
            };
            waiter.release();
            trace!("signal: woke oldest waiter, {} still blocked", state.queue.len());
        }
    }

    /// Consume one unit only if one is immediately available.
    ///
    /// Never blocks and never enqueues the caller; on failure the
    /// semaphore is unchanged.
    pub fn try_wait(&self) -> Result<(), TryWaitError> {
        let mut state = self.state.lock();
        if state.counter <= 0 {
            return Err(TryWaitError::WouldBlock);
        }
        state.counter -= 1;
        Ok(())
    }

    /// Block for a unit and return an RAII permit that signals on drop.
    pub fn access(&self) -> SemaphorePermit<'_> {
        self.wait();
        SemaphorePermit { semaphore: self }
    }

    /// Current counter value (negative when threads are blocked).
    ///
    /// Advisory snapshot for diagnostics and tests; it can be stale by
    /// the time the caller looks at it.
    pub fn permits(&self) -> isize {
        self.state.lock().counter
    }

    /// Number of currently blocked waiters.
    pub fn waiter_count(&self) -> usize {
        self.state.lock().queue.len()
    }
}

impl std::fmt::Debug for Semaphore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.state.try_lock() {
            Some(state) => f
                .debug_struct("Semaphore")
                .field("counter", &state.counter)
                .field("waiters", &state.queue.len())
                .finish(),
            None => f.write_str("Semaphore { <locked> }"),
        }
    }
}

/// RAII guard that returns its unit to the semaphore when dropped.
///
/// Obtained from [`Semaphore::access`]. Useful when the critical section
/// is a lexical scope and an early return or panic must not leak the unit.
pub struct SemaphorePermit<'a> {
    semaphore: &'a Semaphore,
}

impl Drop for SemaphorePermit<'_> {
    fn drop(&mut self) {
        self.semaphore.signal();
    }
}
