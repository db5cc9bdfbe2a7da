/*!
 * Spin Lock
 * Mutual exclusion built from a single atomic flag
 *
 * The lock is acquired by an atomic swap retried in a tight loop and
 * released by a plain store. Acquire/Release ordering on the flag gives
 * the happens-before edge the semaphore relies on: every write made under
 * the lock is visible to the next thread that acquires it.
 *
 * # Use Cases
 *
 * Best for critical sections that are a handful of instructions long and
 * never block while holding the lock. The semaphore holds it only across
 * a counter update and a queue operation.
 */

use crate::config::SpinPolicy;
use std::cell::UnsafeCell;
use std::hint;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Test-and-set spin lock protecting a value of type `T`.
pub struct SpinLock<T> {
    /// Lock state: false = unlocked, true = locked.
    locked: AtomicBool,
    policy: SpinPolicy,
    data: UnsafeCell<T>,
}

// Safety: the atomic flag serializes all access to `data`; the value is
// only reachable through a guard that proves the flag is held.
unsafe impl<T: Send> Send for SpinLock<T> {}
unsafe impl<T: Send> Sync for SpinLock<T> {}

impl<T> SpinLock<T> {
    /// Create a new unlocked spin lock with the default spin policy.
    pub const fn new(data: T) -> Self {
        Self::with_policy(data, SpinPolicy::DEFAULT)
    }

    /// Create a new unlocked spin lock with an explicit spin policy.
    pub const fn with_policy(data: T, policy: SpinPolicy) -> Self {
        Self {
            locked: AtomicBool::new(false),
            policy,
            data: UnsafeCell::new(data),
        }
    }

    /// Acquire the lock, spinning until it is free.
    ///
    /// # Performance
    ///
    /// Hot path - a single uncontended swap. Under contention the loop
    /// issues `spin_loop` hints and yields per the configured policy.
    #[inline]
    pub fn lock(&self) -> SpinLockGuard<'_, T> {
        let mut spins = 0u32;
        while self.locked.swap(true, Ordering::Acquire) {
            if spins >= self.policy.yield_after {
                spins = 0;
                thread::yield_now();
            } else {
                spins += 1;
                hint::spin_loop();
            }
        }
        SpinLockGuard { lock: self }
    }

    /// Attempt to acquire the lock without spinning.
    #[inline]
    pub fn try_lock(&self) -> Option<SpinLockGuard<'_, T>> {
        if self.locked.swap(true, Ordering::Acquire) {
            None
        } else {
            Some(SpinLockGuard { lock: self })
        }
    }

    /// Consume the lock and return the protected value.
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SpinLock<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.try_lock() {
            Some(guard) => f.debug_struct("SpinLock").field("data", &*guard).finish(),
            None => f.write_str("SpinLock { <locked> }"),
        }
    }
}

/// RAII guard that releases the lock when dropped.
pub struct SpinLockGuard<'a, T> {
    lock: &'a SpinLock<T>,
}

impl<T> Deref for SpinLockGuard<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &Self::Target {
        // Safety: the guard's existence proves the flag is held.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for SpinLockGuard<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        // Safety: the guard's existence proves the flag is held.
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for SpinLockGuard<'_, T> {
    #[inline]
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
    }
}
