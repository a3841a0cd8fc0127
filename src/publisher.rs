//! MQTT notification publisher.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rumqttc::{AsyncClient, QoS};
use serde_json::Value;
use tracing::debug;

use duckduck_protocols::{NotificationPublisher, PublishError};

/// Publishes notifications to `{prefix}/{device_code}/{topic}`.
///
/// Publishing never waits on the network: messages are queued on the
/// client's request channel, and dropped while the broker is unreachable.
pub(crate) struct MqttPublisher {
    client: AsyncClient,
    base_topic: String,
    connected: Arc<AtomicBool>,
}

impl MqttPublisher {
    pub(crate) fn new(
        client: AsyncClient,
        prefix: &str,
        device_code: &str,
        connected: Arc<AtomicBool>,
    ) -> Self {
        Self {
            client,
            base_topic: notification_base(prefix, device_code),
            connected,
        }
    }
}

pub(crate) fn notification_base(prefix: &str, device_code: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), device_code)
}

impl NotificationPublisher for MqttPublisher {
    fn publish(&self, topic: &str, payload: Value) -> Result<(), PublishError> {
        if !self.connected.load(Ordering::Acquire) {
            return Err(PublishError::Disconnected);
        }

        let full_topic = format!("{}/{}", self.base_topic, topic);
        let bytes =
            serde_json::to_vec(&payload).map_err(|e| PublishError::SendFailed(e.to_string()))?;

        self.client
            .try_publish(full_topic.as_str(), QoS::AtLeastOnce, false, bytes)
            .map_err(|e| PublishError::SendFailed(e.to_string()))?;

        debug!("Published {} {}", full_topic, payload);
        Ok(())
    }
}
