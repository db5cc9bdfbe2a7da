/*!
 * FIFO Counting Semaphore
 * Counting semaphore with strict first-in-first-out wakeup order
 *
 * The semaphore admits up to N concurrent holders and blocks further
 * callers until a holder signals. Blocked callers are released in exactly
 * the order they arrived. Blocking is implemented by busy-polling a
 * per-waiter handle rather than parking in the OS scheduler - a deliberate
 * simplicity-over-efficiency tradeoff that keeps the handshake protocol
 * fully visible in user code.
 */

pub mod config;
pub mod handle;
pub mod queue;
pub mod semaphore;
pub mod spin;

// Re-exports
pub use config::SpinPolicy;
pub use semaphore::{Semaphore, SemaphorePermit, TryWaitError};

// Re-export building blocks for advanced users
pub use handle::WaiterHandle;
pub use queue::WaitQueue;
pub use spin::{SpinLock, SpinLockGuard};
