//! Backend alarm source protocol.

use async_trait::async_trait;

use crate::error::SourceError;
use crate::types::Alarm;

/// The backend's authoritative list of alarms for this device.
#[async_trait]
pub trait AlarmSource: Send + Sync {
    /// Fetch all alarms, in backend order.
    async fn fetch_alarms(&self) -> Result<Vec<Alarm>, SourceError>;
}
