//! Illumination service protocol.
//!
//! The illumination service is a local HTTP daemon driving the lamp. Every
//! call is best-effort: the returned body is only logged by callers.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::IlluminationError;

/// Number of discrete steps in a sunrise ramp on the illumination service.
pub const SUNRISE_RAMP_STEPS: u32 = 185;

/// Client for the local illumination service.
#[async_trait]
pub trait IlluminationClient: Send + Sync {
    /// Set hue/saturation/lightness. The instruction is forwarded verbatim.
    async fn set_hsl(&self, data: Value) -> Result<String, IlluminationError>;

    /// Set correlated color temperature. The instruction is forwarded verbatim.
    async fn set_cct(&self, data: Value) -> Result<String, IlluminationError>;

    /// Switch the lamp on or off.
    async fn set_power(&self, on: bool) -> Result<String, IlluminationError>;

    /// Start the pre-bed dim sequence.
    async fn dim(&self) -> Result<String, IlluminationError>;

    /// Start a sunrise ramp, `time_unit` seconds per step.
    async fn start_sunrise(&self, time_unit: f64) -> Result<String, IlluminationError>;
}
