//! Command dispatch.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use duckduck_alarms::{AlarmManager, ManagerError, ResyncSummary};
use duckduck_protocols::{AlarmSource, IlluminationClient, IlluminationError, SourceError};

use crate::command::{Command, CommandKind};
use crate::error::EventError;

/// How a command was handled.
#[derive(Debug)]
pub enum Handled {
    /// A lighting call is running in the background.
    Lighting(JoinHandle<()>),
    /// The command completed before `handle` returned.
    Completed,
}

/// Routes inbound commands to the illumination service and the alarm
/// manager.
pub struct EventRouter {
    illumination: Arc<dyn IlluminationClient>,
    alarms: Arc<AlarmManager>,
    alarm_source: Option<Arc<dyn AlarmSource>>,
}

impl EventRouter {
    pub fn new(illumination: Arc<dyn IlluminationClient>, alarms: Arc<AlarmManager>) -> Self {
        Self {
            illumination,
            alarms,
            alarm_source: None,
        }
    }

    /// Backend used by `register` to resync alarms.
    pub fn with_alarm_source(mut self, source: Arc<dyn AlarmSource>) -> Self {
        self.alarm_source = Some(source);
        self
    }

    pub fn alarms(&self) -> &Arc<AlarmManager> {
        &self.alarms
    }

    /// Whether an alarm source is configured for `register`.
    pub fn can_resync(&self) -> bool {
        self.alarm_source.is_some()
    }

    pub fn is_handling(&self, name: &str) -> bool {
        CommandKind::from_name(name).is_some()
    }

    /// Parse and dispatch the `name` command.
    pub async fn handle(&self, name: &str, payload: &[u8]) -> Result<Handled, EventError> {
        let kind = CommandKind::from_name(name)
            .ok_or_else(|| EventError::UnknownCommand(name.to_string()))?;
        let command = Command::parse(kind, payload)?;
        self.dispatch(command).await
    }

    pub async fn dispatch(&self, command: Command) -> Result<Handled, EventError> {
        debug!("Dispatching {}", command.kind());

        let handled = match command {
            Command::Hsl(data) => {
                let client = Arc::clone(&self.illumination);
                spawn_lighting("hsl", async move { client.set_hsl(data).await })
            }
            Command::Cct(data) => {
                let client = Arc::clone(&self.illumination);
                spawn_lighting("cct", async move { client.set_cct(data).await })
            }
            Command::Power(on) => {
                let client = Arc::clone(&self.illumination);
                spawn_lighting("power", async move { client.set_power(on).await })
            }
            Command::CreateAlarm(alarm) => {
                self.alarms.create(&alarm)?;
                Handled::Completed
            }
            Command::UpdateAlarm(alarm) => {
                self.alarms.update(&alarm)?;
                Handled::Completed
            }
            Command::DeleteAlarm(alarm_id) => {
                self.alarms.delete(&alarm_id);
                Handled::Completed
            }
            Command::UpdateSweetDreams(update) => {
                let config = self.alarms.sweet_dreams().apply(update);
                info!(
                    "Sweet dreams updated: dim {} ({} min), lullaby {}",
                    if config.dim_active { "on" } else { "off" },
                    config.dim_minutes,
                    config.lullaby.as_deref().unwrap_or("none")
                );
                Handled::Completed
            }
            Command::Register => {
                self.resync().await?;
                Handled::Completed
            }
        };

        Ok(handled)
    }

    /// Replace all alarms with the backend's list.
    pub async fn resync(&self) -> Result<ResyncSummary, EventError> {
        let source = self
            .alarm_source
            .as_ref()
            .ok_or(ManagerError::Source(SourceError::NotConfigured))?;
        Ok(self.alarms.resync_from(source.as_ref()).await?)
    }
}

fn spawn_lighting<F>(endpoint: &'static str, call: F) -> Handled
where
    F: Future<Output = Result<String, IlluminationError>> + Send + 'static,
{
    Handled::Lighting(tokio::spawn(async move {
        match call.await {
            Ok(body) => debug!("/{} -> {}", endpoint, body),
            Err(e) => warn!("/{} failed: {}", endpoint, e),
        }
    }))
}
