//! Notification publisher errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Publisher disconnected")]
    Disconnected,

    #[error("Publish failed: {0}")]
    SendFailed(String),
}
