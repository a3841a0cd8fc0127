//! Command handling errors.

use duckduck_alarms::ManagerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Malformed {command} payload: {message}")]
    MalformedPayload { command: String, message: String },

    #[error(transparent)]
    Alarm(#[from] ManagerError),
}

impl EventError {
    pub(crate) fn malformed(command: &str, message: impl ToString) -> Self {
        EventError::MalformedPayload {
            command: command.to_string(),
            message: message.to_string(),
        }
    }
}
