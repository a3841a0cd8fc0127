//! Recording collaborators for unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use duckduck_protocols::{IlluminationClient, IlluminationError, NotificationPublisher, PublishError};

use crate::actions::JobContext;
use crate::sweet_dreams::SweetDreams;

#[derive(Default)]
pub struct RecordingIllumination {
    pub calls: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingIllumination {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) -> Result<String, IlluminationError> {
        self.calls.lock().push(call);
        if self.fail {
            Err(IlluminationError::RequestFailed("connection refused".to_string()))
        } else {
            Ok("ok".to_string())
        }
    }
}

#[async_trait]
impl IlluminationClient for RecordingIllumination {
    async fn set_hsl(&self, data: Value) -> Result<String, IlluminationError> {
        self.record(format!("hsl {}", data))
    }

    async fn set_cct(&self, data: Value) -> Result<String, IlluminationError> {
        self.record(format!("cct {}", data))
    }

    async fn set_power(&self, on: bool) -> Result<String, IlluminationError> {
        self.record(format!("power {}", on))
    }

    async fn dim(&self) -> Result<String, IlluminationError> {
        self.record("dim".to_string())
    }

    async fn start_sunrise(&self, time_unit: f64) -> Result<String, IlluminationError> {
        self.record(format!("sunrise {:.3}", time_unit))
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    pub published: Mutex<Vec<(String, Value)>>,
}

impl RecordingPublisher {
    pub fn published(&self) -> Vec<(String, Value)> {
        self.published.lock().clone()
    }
}

impl NotificationPublisher for RecordingPublisher {
    fn publish(&self, topic: &str, payload: Value) -> Result<(), PublishError> {
        self.published.lock().push((topic.to_string(), payload));
        Ok(())
    }
}

pub struct Harness {
    pub illumination: Arc<RecordingIllumination>,
    pub publisher: Arc<RecordingPublisher>,
    pub context: Arc<JobContext>,
}

pub fn harness_with(illumination: RecordingIllumination, sweet_dreams: SweetDreams) -> Harness {
    let illumination = Arc::new(illumination);
    let publisher = Arc::new(RecordingPublisher::default());
    let context = Arc::new(JobContext::new(
        illumination.clone(),
        publisher.clone(),
        sweet_dreams,
    ));
    Harness {
        illumination,
        publisher,
        context,
    }
}

pub fn harness() -> Harness {
    harness_with(RecordingIllumination::default(), SweetDreams::default())
}
