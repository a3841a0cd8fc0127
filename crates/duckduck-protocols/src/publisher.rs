//! Notification publisher protocol.

use serde_json::Value;

use crate::error::PublishError;

/// Relative notification topics published by the agent.
pub mod topics {
    /// A wake-up alarm fired. Payload: `{"id": <alarm id>}`.
    pub const ALARM_TRIGGERED: &str = "alarm-triggered";

    /// Bedtime notification. Payload: `{"current_lullaby_song_path": <path>}` or `{}`.
    pub const SWEET_DREAMS: &str = "sweet-dreams";
}

/// Fire-and-forget publisher for outbound notifications.
///
/// Implementations must not block on delivery; no acknowledgement is
/// observed by callers.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, topic: &str, payload: Value) -> Result<(), PublishError>;
}
