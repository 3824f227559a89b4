//! Blocking wait abstraction.
//!
//! Readiness polling and retry backoff sleep through a [`Sleeper`] so the
//! loops can be driven in tests without wall-clock delay.

use std::time::Duration;

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Records requested sleeps and returns immediately.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    slept: std::sync::Mutex<Vec<Duration>>,
}

#[cfg(any(test, feature = "test-helpers"))]
impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.slept
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn count(&self) -> usize {
        self.sleeps().len()
    }

    pub fn total(&self) -> Duration {
        self.sleeps().iter().sum()
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.slept
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(duration);
    }
}
