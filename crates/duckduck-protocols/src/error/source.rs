//! Backend alarm source errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Alarm source not configured")]
    NotConfigured,

    #[error("Alarm source unavailable: {0}")]
    Unavailable(String),

    #[error("Alarm source returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid alarm list: {0}")]
    InvalidPayload(String),
}
