//! Wall-clock time of day at minute resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AlarmError;

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

/// Hour and minute of a day, `hour` in `0..=23`, `minute` in `0..=59`.
///
/// Serialized as `{"h": 7, "m": 30}`; `hour`/`minute` keys are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeOfDay")]
pub struct TimeOfDay {
    #[serde(rename = "h")]
    hour: u32,
    #[serde(rename = "m")]
    minute: u32,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { hour: 0, minute: 0 };

    /// Create a validated time of day.
    pub fn new(hour: u32, minute: u32) -> Result<Self, AlarmError> {
        if hour > 23 || minute > 59 {
            return Err(AlarmError::InvalidTime { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    /// Seconds elapsed since midnight.
    pub fn seconds_since_midnight(&self) -> u32 {
        self.minutes_since_midnight() * 60
    }

    /// Subtract `minutes`, wrapping modulo one day.
    ///
    /// The flag is `true` when the result lies on the previous calendar day.
    pub fn subtract_minutes(&self, minutes: u32) -> (TimeOfDay, bool) {
        self.offset(-i64::from(minutes))
    }

    /// Subtract `minutes`, returning the wrapped time and how many calendar
    /// days earlier it lies.
    pub fn subtract_minutes_days(&self, minutes: u32) -> (TimeOfDay, u32) {
        let raw = i64::from(self.minutes_since_midnight()) - i64::from(minutes);
        let (time, _) = self.offset(-i64::from(minutes));
        (time, (-raw.div_euclid(MINUTES_PER_DAY)) as u32)
    }

    /// Add `minutes`, wrapping modulo one day.
    ///
    /// The flag is `true` when the result lies on the next calendar day.
    pub fn add_minutes(&self, minutes: u32) -> (TimeOfDay, bool) {
        self.offset(i64::from(minutes))
    }

    fn offset(&self, delta: i64) -> (TimeOfDay, bool) {
        let raw = i64::from(self.minutes_since_midnight()) + delta;
        let crossed = !(0..MINUTES_PER_DAY).contains(&raw);
        let wrapped = raw.rem_euclid(MINUTES_PER_DAY);
        let time = TimeOfDay {
            hour: (wrapped / MINUTES_PER_HOUR) as u32,
            minute: (wrapped % MINUTES_PER_HOUR) as u32,
        };
        (time, crossed)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Deserialize)]
struct RawTimeOfDay {
    #[serde(alias = "hour")]
    h: u32,
    #[serde(alias = "minute")]
    m: u32,
}

impl TryFrom<RawTimeOfDay> for TimeOfDay {
    type Error = AlarmError;

    fn try_from(raw: RawTimeOfDay) -> Result<Self, Self::Error> {
        TimeOfDay::new(raw.h, raw.m)
    }
}
