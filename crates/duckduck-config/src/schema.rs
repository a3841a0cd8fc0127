//! Configuration schema definitions.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default config file name, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".device_config";

/// Root device configuration.
///
/// Top-level keys match the provisioning file written next to the agent
/// (`device_code`, `mqtt_host`, `illumination_service`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Device code; also the MQTT topic root this device listens on.
    pub device_code: String,

    /// Device secret used to authenticate against the backend.
    pub device_key: String,

    #[serde(default)]
    pub mqtt_username: String,

    #[serde(default)]
    pub mqtt_password: String,

    pub mqtt_host: String,

    #[serde(default = "default_mqtt_port")]
    pub mqtt_port: u16,

    #[serde(default = "default_true")]
    pub mqtt_tls: bool,

    /// Base URL of the local illumination service.
    pub illumination_service: String,

    /// Backend base URL for alarm resync. Resync is disabled when unset.
    #[serde(default)]
    pub backend_url: Option<String>,

    /// Topic prefix for outbound notifications.
    #[serde(default = "default_notification_prefix")]
    pub notification_prefix: String,

    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    #[serde(default = "default_scheduler_tick_ms")]
    pub scheduler_tick_ms: u64,

    #[serde(default)]
    pub log_dir: Option<String>,

    #[serde(default)]
    pub sweet_dreams: SweetDreamsDefaults,
}

impl DeviceConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn scheduler_tick(&self) -> Duration {
        Duration::from_millis(self.scheduler_tick_ms)
    }

    /// Log directory, `~` expanded, falling back to `~/.duckduck/logs`.
    pub fn log_dir(&self) -> PathBuf {
        match &self.log_dir {
            Some(dir) => PathBuf::from(shellexpand::tilde(dir).to_string()),
            None => dirs::home_dir()
                .map(|h| h.join(".duckduck").join("logs"))
                .unwrap_or_else(|| PathBuf::from(".duckduck/logs")),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            device_code: String::new(),
            device_key: String::new(),
            mqtt_username: String::new(),
            mqtt_password: String::new(),
            mqtt_host: String::new(),
            mqtt_port: default_mqtt_port(),
            mqtt_tls: true,
            illumination_service: String::new(),
            backend_url: None,
            notification_prefix: default_notification_prefix(),
            http_timeout_secs: default_http_timeout_secs(),
            scheduler_tick_ms: default_scheduler_tick_ms(),
            log_dir: None,
            sweet_dreams: SweetDreamsDefaults::default(),
        }
    }
}

/// Initial sweet-dreams settings, used until the first update command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweetDreamsDefaults {
    #[serde(default = "default_true")]
    pub dim_active: bool,

    /// Minutes before bedtime the dim job fires.
    #[serde(default = "default_dim_minutes")]
    pub dim_minutes: u32,

    #[serde(default)]
    pub lullaby: Option<String>,
}

impl Default for SweetDreamsDefaults {
    fn default() -> Self {
        Self {
            dim_active: true,
            dim_minutes: default_dim_minutes(),
            lullaby: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_mqtt_port() -> u16 {
    8883
}

fn default_notification_prefix() -> String {
    "notifications".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_scheduler_tick_ms() -> u64 {
    1000
}

fn default_dim_minutes() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DeviceConfig::default();
        assert_eq!(config.mqtt_port, 8883);
        assert!(config.mqtt_tls);
        assert_eq!(config.notification_prefix, "notifications");
        assert_eq!(config.http_timeout(), Duration::from_secs(10));
        assert_eq!(config.scheduler_tick(), Duration::from_millis(1000));
        assert_eq!(config.sweet_dreams.dim_minutes, 1);
        assert!(config.sweet_dreams.dim_active);
    }

    #[test]
    fn test_log_dir_default() {
        let config = DeviceConfig::default();
        assert!(config.log_dir().ends_with("logs"));
    }

    #[test]
    fn test_log_dir_tilde_expanded() {
        let config = DeviceConfig {
            log_dir: Some("~/duck-logs".to_string()),
            ..Default::default()
        };
        let dir = config.log_dir();
        assert!(!dir.to_string_lossy().starts_with('~'));
        assert!(dir.ends_with("duck-logs"));
    }
}
