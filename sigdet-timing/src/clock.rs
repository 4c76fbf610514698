use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Trait for the wall-clock source the trial scheduler suspends on. The wait
/// is duration-based and cancellable, decoupled from any event loop, so tests
/// can drive it with a virtual clock.
pub trait Clock: Clone + Send + Sync {
    type Timestamp: Copy + Send + Sync;

    fn now(&self) -> Self::Timestamp;
    fn elapsed(&self, since: Self::Timestamp) -> Duration;

    /// Suspend for `duration`, returning early when `cancel` is raised.
    /// Returns false if the wait was cancelled. Never busy-waits.
    fn wait(&self, duration: Duration, cancel: &AtomicBool) -> bool;
}

/// Slice length between cancellation checks during a wait.
const CANCEL_POLL: Duration = Duration::from_millis(10);

/// OS-backed monotonic clock with a high-precision sleep.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    fn high_precision_sleep(&self, duration: Duration) {
        #[cfg(target_os = "linux")]
        self.linux_sleep(duration);
        #[cfg(not(target_os = "linux"))]
        std::thread::sleep(duration);
    }

    #[cfg(target_os = "linux")]
    fn linux_sleep(&self, duration: Duration) {
        use libc::{clock_nanosleep, timespec, CLOCK_MONOTONIC};

        let req = timespec {
            tv_sec: duration.as_secs() as libc::time_t,
            tv_nsec: duration.subsec_nanos() as libc::c_long,
        };

        unsafe {
            clock_nanosleep(CLOCK_MONOTONIC, 0, &req, std::ptr::null_mut());
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    type Timestamp = u64;

    fn now(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }

    fn elapsed(&self, since: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(since))
    }

    fn wait(&self, duration: Duration, cancel: &AtomicBool) -> bool {
        let deadline = self.now() + duration.as_nanos() as u64;
        loop {
            if cancel.load(Ordering::Relaxed) {
                return false;
            }
            let remaining = Duration::from_nanos(deadline.saturating_sub(self.now()));
            if remaining.is_zero() {
                return true;
            }
            self.high_precision_sleep(remaining.min(CANCEL_POLL));
        }
    }
}

/// Test clock: `wait` advances time instantly instead of sleeping. Clones
/// share the same timeline so a scheduler's clock and the test's handle agree.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now_ns: Arc<AtomicU64>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, duration: Duration) {
        self.now_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for VirtualClock {
    type Timestamp = u64;

    fn now(&self) -> u64 {
        self.now_ns.load(Ordering::SeqCst)
    }

    fn elapsed(&self, since: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(since))
    }

    fn wait(&self, duration: Duration, cancel: &AtomicBool) -> bool {
        if cancel.load(Ordering::Relaxed) {
            return false;
        }
        self.advance(duration);
        true
    }
}
