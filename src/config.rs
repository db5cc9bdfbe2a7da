/*!
 * Spin Policy Configuration
 * Runtime tuning for the crate's busy-wait loops
 */

/// How a busy-wait loop behaves between failed checks.
///
/// Both the guard acquisition loop in [`crate::spin::SpinLock`] and the
/// handle polling loop in [`crate::handle::WaiterHandle`] consult this
/// policy. It only controls how often the spinning thread yields to the
/// scheduler - it never changes blocking semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinPolicy {
    /// Spin iterations between `thread::yield_now` calls.
    ///
    /// `0` yields on every iteration.
    pub yield_after: u32,
}

impl Default for SpinPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl SpinPolicy {
    /// Default policy, usable in const contexts.
    pub const DEFAULT: Self = Self { yield_after: 64 };

    /// Policy for low-latency handoffs (< 10µs expected): spin hard,
    /// yield rarely. Higher CPU usage while waiting.
    pub const fn aggressive() -> Self {
        Self { yield_after: 1024 }
    }

    /// Policy for oversubscribed hosts: give the scheduler frequent
    /// chances to run the thread that will release us.
    pub const fn cooperative() -> Self {
        Self { yield_after: 4 }
    }
}
