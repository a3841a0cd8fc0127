//! Error types for the scheduler.

use thiserror::Error;

/// Errors that can occur when registering jobs.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The job has no weekdays to fire on.
    #[error("Job {0} has no weekdays")]
    EmptyWeekdays(String),

    /// The generated cron expression was rejected.
    #[error("Invalid schedule '{expr}' for job {job_id}: {message}")]
    InvalidSchedule {
        job_id: String,
        expr: String,
        message: String,
    },
}

/// Result type for scheduler operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_weekdays_error() {
        let err = SchedulerError::EmptyWeekdays("w1".to_string());
        let display = err.to_string();
        assert!(display.contains("w1"));
        assert!(display.contains("no weekdays"));
    }

    #[test]
    fn test_invalid_schedule_error() {
        let err = SchedulerError::InvalidSchedule {
            job_id: "d1".to_string(),
            expr: "0 61 25 * * *".to_string(),
            message: "out of range".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("d1"));
        assert!(display.contains("0 61 25 * * *"));
        assert!(display.contains("out of range"));
    }
}
