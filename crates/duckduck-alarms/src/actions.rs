//! What derived jobs do when they fire.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use duckduck_protocols::{IlluminationClient, IlluminationError, NotificationPublisher, topics};
use duckduck_scheduler::JobCallback;

use crate::derived::JobAction;
use crate::sweet_dreams::SweetDreams;

/// Collaborators shared by every fired job.
pub struct JobContext {
    pub illumination: Arc<dyn IlluminationClient>,
    pub publisher: Arc<dyn NotificationPublisher>,
    pub sweet_dreams: SweetDreams,
}

impl JobContext {
    pub fn new(
        illumination: Arc<dyn IlluminationClient>,
        publisher: Arc<dyn NotificationPublisher>,
        sweet_dreams: SweetDreams,
    ) -> Self {
        Self {
            illumination,
            publisher,
            sweet_dreams,
        }
    }

    /// Run `action` for `job_id`.
    ///
    /// Delivery failures are logged. They never propagate, since the job
    /// stays scheduled either way.
    pub async fn execute(&self, job_id: &str, action: &JobAction) {
        match action {
            JobAction::WakeTrigger { alarm_id } => {
                info!("Alarm {} triggered", alarm_id);
                self.publish(job_id, topics::ALARM_TRIGGERED, json!({ "id": alarm_id }));
            }
            JobAction::Dim => {
                let config = self.sweet_dreams.snapshot();
                if config.dim_active {
                    log_response(job_id, "dim", self.illumination.dim().await);
                    self.publish(job_id, topics::SWEET_DREAMS, config.notification_payload());
                } else {
                    debug!("Job {}: dimming disabled", job_id);
                    self.publish(job_id, topics::SWEET_DREAMS, json!({}));
                }
            }
            JobAction::PowerOff => {
                log_response(job_id, "power", self.illumination.set_power(false).await);
                self.publish(job_id, topics::SWEET_DREAMS, json!({}));
            }
            JobAction::Sunrise { time_unit } => {
                log_response(
                    job_id,
                    "sunrise",
                    self.illumination.start_sunrise(*time_unit).await,
                );
            }
        }
    }

    fn publish(&self, job_id: &str, topic: &str, payload: Value) {
        if let Err(e) = self.publisher.publish(topic, payload) {
            warn!("Job {}: failed to publish {}: {}", job_id, topic, e);
        }
    }
}

fn log_response(job_id: &str, endpoint: &str, result: Result<String, IlluminationError>) {
    match result {
        Ok(body) => debug!("Job {}: /{} -> {}", job_id, endpoint, body),
        Err(e) => warn!("Job {}: /{} failed: {}", job_id, endpoint, e),
    }
}

/// Scheduler callback running one [`JobAction`].
pub struct AlarmJob {
    action: JobAction,
    context: Arc<JobContext>,
}

impl AlarmJob {
    pub fn new(action: JobAction, context: Arc<JobContext>) -> Self {
        Self { action, context }
    }
}

#[async_trait]
impl JobCallback for AlarmJob {
    async fn run(&self, job_id: &str) {
        self.context.execute(job_id, &self.action).await;
    }
}
