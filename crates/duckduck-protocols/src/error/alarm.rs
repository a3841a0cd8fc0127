//! Alarm record errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlarmError {
    #[error("Invalid time of day: {hour:02}:{minute:02}")]
    InvalidTime { hour: u32, minute: u32 },

    #[error("Unknown weekday token: {0}")]
    UnknownWeekday(String),

    #[error("Alarm {alarm_id} has no repeat days")]
    EmptyRepeatDays { alarm_id: String },

    #[error("Malformed alarm payload: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for AlarmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
