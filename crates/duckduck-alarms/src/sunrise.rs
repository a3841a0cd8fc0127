//! Sunrise ramp timing.

use duckduck_protocols::{SUNRISE_RAMP_STEPS, SunriseWindow, TimeOfDay};

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Ramp from `start` to `peak` brightness.
///
/// Both times are wall-clock times without a date. When `start` is later
/// than `peak` the ramp spans midnight and `start` belongs to the previous
/// day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunriseProfile {
    start: TimeOfDay,
    peak: TimeOfDay,
}

impl SunriseProfile {
    pub fn new(start: TimeOfDay, peak: TimeOfDay) -> Self {
        Self { start, peak }
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn peak(&self) -> TimeOfDay {
        self.peak
    }

    pub fn crosses_midnight(&self) -> bool {
        self.start > self.peak
    }

    /// Seconds from start to peak.
    pub fn duration_seconds(&self) -> u32 {
        let start = self.start.seconds_since_midnight();
        let peak = self.peak.seconds_since_midnight();
        if self.crosses_midnight() {
            peak + SECONDS_PER_DAY - start
        } else {
            peak - start
        }
    }

    /// Seconds per ramp step. Zero when start and peak coincide.
    pub fn time_unit(&self) -> f64 {
        f64::from(self.duration_seconds()) / f64::from(SUNRISE_RAMP_STEPS)
    }
}

impl From<&SunriseWindow> for SunriseProfile {
    fn from(window: &SunriseWindow) -> Self {
        Self::new(window.start_time, window.peak_time)
    }
}
