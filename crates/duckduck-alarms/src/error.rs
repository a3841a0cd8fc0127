//! Alarm manager errors.

use duckduck_protocols::{AlarmError, SourceError};
use duckduck_scheduler::SchedulerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Invalid alarm: {0}")]
    InvalidAlarm(#[from] AlarmError),

    #[error("Failed to schedule job: {0}")]
    Schedule(#[from] SchedulerError),

    #[error("Alarm list unavailable: {0}")]
    Source(#[from] SourceError),
}

pub type ManagerResult<T> = Result<T, ManagerError>;
