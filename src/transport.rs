//! MQTT transport: connection, subscription and inbound routing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use rumqttc::{AsyncClient, ClientError, Event, EventLoop, MqttOptions, Packet, QoS, Transport};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use duckduck_config::DeviceConfig;

const KEEP_ALIVE: Duration = Duration::from_secs(60);
const REQUEST_CAPACITY: usize = 64;
const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Work handed from the transport to the command worker.
#[derive(Debug)]
pub(crate) enum Inbound {
    /// A command published to `{device_code}/{name}`.
    Command { name: String, payload: Vec<u8> },
    /// The broker accepted a (re)connection.
    Connected,
}

/// Subscription filter for every command addressed to this device.
pub(crate) fn command_filter(device_code: &str) -> String {
    format!("{}/#", device_code)
}

/// Command name of an inbound topic: the segment after the device code.
pub(crate) fn command_name<'a>(topic: &'a str, device_code: &str) -> Option<&'a str> {
    let mut segments = topic.split('/');
    if segments.next()? != device_code {
        return None;
    }
    segments.next().filter(|name| !name.is_empty())
}

pub(crate) fn mqtt_options(config: &DeviceConfig) -> MqttOptions {
    let short_id = uuid::Uuid::new_v4().simple().to_string();
    let client_id = format!("duckduck-{}-{}", config.device_code, &short_id[..8]);

    let mut options = MqttOptions::new(client_id, &config.mqtt_host, config.mqtt_port);
    options.set_keep_alive(KEEP_ALIVE);
    if !config.mqtt_username.is_empty() {
        options.set_credentials(&config.mqtt_username, &config.mqtt_password);
    }
    if config.mqtt_tls {
        options.set_transport(Transport::tls_with_default_config());
    }
    options
}

/// Queue the command subscription without waiting for channel capacity.
pub(crate) fn subscribe_commands(client: &AsyncClient, filter: &str) -> Result<(), ClientError> {
    client.try_subscribe(filter, QoS::AtLeastOnce)
}

/// MQTT connection owned by the agent.
pub(crate) struct MqttTransport {
    client: AsyncClient,
    eventloop: EventLoop,
    device_code: String,
    connected: Arc<AtomicBool>,
}

impl MqttTransport {
    pub(crate) fn new(config: &DeviceConfig) -> Self {
        let (client, eventloop) = AsyncClient::new(mqtt_options(config), REQUEST_CAPACITY);
        Self {
            client,
            eventloop,
            device_code: config.device_code.clone(),
            connected: Arc::new(AtomicBool::new(false)),
        }
    }

    pub(crate) fn client(&self) -> AsyncClient {
        self.client.clone()
    }

    /// Connection flag shared with the notification publisher.
    pub(crate) fn connected(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.connected)
    }

    /// Poll the connection until SIGINT or SIGTERM.
    ///
    /// Returns the name of the signal that stopped the loop.
    pub(crate) async fn run(mut self, inbound: mpsc::UnboundedSender<Inbound>) -> Result<&'static str> {
        let filter = command_filter(&self.device_code);

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?;

        let exit_reason = loop {
            tokio::select! {
                event = self.eventloop.poll() => match event {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        match command_name(&publish.topic, &self.device_code) {
                            Some(name) => {
                                debug!("Received {} ({} bytes)", publish.topic, publish.payload.len());
                                let _ = inbound.send(Inbound::Command {
                                    name: name.to_string(),
                                    payload: publish.payload.to_vec(),
                                });
                            }
                            None => warn!("Ignoring message on {}", publish.topic),
                        }
                    }
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        info!("Connected to MQTT broker");
                        self.connected.store(true, Ordering::Release);

                        // Subscriptions are renewed on every reconnect. Never await
                        // the request channel here: only this loop drains it.
                        match subscribe_commands(&self.client, &filter) {
                            Ok(()) => info!("Subscribed to {}", filter),
                            Err(e) => error!("Subscribe to {} failed: {}", filter, e),
                        }
                        let _ = inbound.send(Inbound::Connected);
                    }
                    Ok(Event::Incoming(Packet::Disconnect)) => {
                        warn!("Broker closed the connection");
                        self.connected.store(false, Ordering::Release);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        if self.connected.swap(false, Ordering::AcqRel) {
                            error!("MQTT connection lost: {}", e);
                        } else {
                            debug!("MQTT connection error: {}", e);
                        }
                        tokio::time::sleep(RECONNECT_DELAY).await;
                    }
                },

                _ = &mut ctrl_c => break "SIGINT",

                _ = sigterm.recv() => break "SIGTERM",
            }
        };

        self.connected.store(false, Ordering::Release);
        if let Err(e) = self.client.try_disconnect() {
            debug!("Disconnect request not sent: {}", e);
        }
        Ok(exit_reason)
    }
}
