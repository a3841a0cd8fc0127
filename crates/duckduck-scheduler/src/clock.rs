//! Time source abstraction for the scheduler.
//!
//! The tick loop reads wall-clock local time through [`TimeSource`] so tests
//! can drive it with a [`ManualTimeSource`] instead of waiting for real
//! minutes to pass.

use chrono::{DateTime, Duration, Local};
use parking_lot::Mutex;

/// Source of the current local time.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Real system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Manually driven clock.
#[derive(Debug)]
pub struct ManualTimeSource {
    now: Mutex<DateTime<Local>>,
}

impl ManualTimeSource {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, now: DateTime<Local>) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock()
    }
}
