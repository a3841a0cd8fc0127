//! Illumination service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IlluminationError {
    #[error("Illumination request failed: {0}")]
    RequestFailed(String),

    #[error("Illumination service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid lighting instruction: {0}")]
    InvalidInstruction(String),
}
