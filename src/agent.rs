//! Agent wiring and the command worker.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use duckduck_alarms::{AlarmManager, JobContext, SweetDreams, SweetDreamsConfig};
use duckduck_config::{DeviceConfig, SweetDreamsDefaults};
use duckduck_events::{EventError, EventRouter};
use duckduck_http::{HttpAlarmSource, IlluminationHttpClient};
use duckduck_protocols::{IlluminationClient, NotificationPublisher};
use duckduck_scheduler::JobScheduler;

use crate::publisher::MqttPublisher;
use crate::transport::{Inbound, MqttTransport};

pub(crate) fn sweet_dreams_config(defaults: &SweetDreamsDefaults) -> SweetDreamsConfig {
    SweetDreamsConfig {
        dim_active: defaults.dim_active,
        dim_minutes: defaults.dim_minutes,
        lullaby: defaults.lullaby.clone(),
    }
}

/// Build the router and its alarm engine from `config`.
pub(crate) fn build_router(
    config: &DeviceConfig,
    scheduler: Arc<JobScheduler>,
    publisher: Arc<dyn NotificationPublisher>,
) -> Result<EventRouter> {
    let illumination: Arc<dyn IlluminationClient> = Arc::new(
        IlluminationHttpClient::new(&config.illumination_service, config.http_timeout())
            .context("Failed to create illumination client")?,
    );

    let context = Arc::new(JobContext::new(
        Arc::clone(&illumination),
        publisher,
        SweetDreams::new(sweet_dreams_config(&config.sweet_dreams)),
    ));
    let manager = Arc::new(AlarmManager::new(scheduler, context));
    let mut router = EventRouter::new(illumination, manager);

    match &config.backend_url {
        Some(url) => {
            let source = HttpAlarmSource::new(
                url,
                &config.device_code,
                config.device_key.clone(),
                config.http_timeout(),
            )
            .context("Failed to create backend alarm source")?;
            info!("Alarm backend: {}", source.url());
            router = router.with_alarm_source(Arc::new(source));
        }
        None => warn!("No backend_url configured, alarms will not be resynced"),
    }

    Ok(router)
}

/// Run the agent until SIGINT or SIGTERM.
pub(crate) async fn run(config: DeviceConfig) -> Result<()> {
    info!(
        "Starting DuckDuck agent for device {} (broker {}:{})",
        config.device_code, config.mqtt_host, config.mqtt_port
    );

    let transport = MqttTransport::new(&config);
    let publisher = Arc::new(MqttPublisher::new(
        transport.client(),
        &config.notification_prefix,
        &config.device_code,
        transport.connected(),
    ));

    let scheduler = Arc::new(JobScheduler::new());
    let router = Arc::new(build_router(&config, Arc::clone(&scheduler), publisher)?);
    scheduler.start(config.scheduler_tick());

    let (tx, rx) = mpsc::unbounded_channel();
    let worker = tokio::spawn(command_worker(Arc::clone(&router), rx));

    let reason = transport.run(tx).await?;
    info!("Received {}, shutting down", reason);

    scheduler.stop();
    if let Err(e) = worker.await {
        warn!("Command worker ended abnormally: {}", e);
    }
    info!("DuckDuck agent stopped");
    Ok(())
}

/// Handle inbound work one item at a time, in arrival order.
pub(crate) async fn command_worker(router: Arc<EventRouter>, mut rx: mpsc::UnboundedReceiver<Inbound>) {
    while let Some(item) = rx.recv().await {
        match item {
            Inbound::Command { name, payload } => handle_command(&router, &name, &payload).await,
            Inbound::Connected => {
                if !router.can_resync() {
                    continue;
                }
                match router.resync().await {
                    Ok(summary) => debug!("Resync on connect: {:?}", summary),
                    Err(e) => warn!("Resync on connect failed, keeping current alarms: {}", e),
                }
            }
        }
    }
    debug!("Command worker stopped");
}

async fn handle_command(router: &EventRouter, name: &str, payload: &[u8]) {
    match router.handle(name, payload).await {
        Ok(_) => debug!("Handled {}", name),
        Err(EventError::UnknownCommand(name)) => warn!("Unknown command received: {}", name),
        Err(e) => warn!("Command {} rejected: {}", name, e),
    }
}
