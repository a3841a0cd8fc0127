//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::DeviceConfig;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error, if any, into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &DeviceConfig) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_device(config, &mut result);
        Self::validate_mqtt(config, &mut result);
        Self::validate_endpoints(config, &mut result);
        Self::validate_scheduler(config, &mut result);

        result
    }

    fn validate_device(config: &DeviceConfig, result: &mut ValidationResult) {
        if config.device_code.is_empty() {
            result.add_error(ValidationError::new(
                "device_code",
                "Device code cannot be empty",
            ));
        }
        if config.device_code.contains(['/', '#', '+']) {
            result.add_error(ValidationError::new(
                "device_code",
                "Device code cannot contain MQTT topic characters",
            ));
        }
        if config.device_key.is_empty() {
            result.add_warning(ValidationWarning::new(
                "device_key",
                "Device key is empty, backend requests will be unauthenticated",
            ));
        }
    }

    fn validate_mqtt(config: &DeviceConfig, result: &mut ValidationResult) {
        if config.mqtt_host.is_empty() {
            result.add_error(ValidationError::new("mqtt_host", "Host cannot be empty"));
        }
        if config.mqtt_port == 0 {
            result.add_error(ValidationError::new("mqtt_port", "Port cannot be 0"));
        }
        if !config.mqtt_tls && !config.mqtt_password.is_empty() {
            result.add_warning(ValidationWarning::new(
                "mqtt_tls",
                "MQTT credentials will be sent without TLS",
            ));
        }
    }

    fn validate_endpoints(config: &DeviceConfig, result: &mut ValidationResult) {
        if config.illumination_service.is_empty() {
            result.add_error(ValidationError::new(
                "illumination_service",
                "Illumination service URL cannot be empty",
            ));
        } else if !is_http_url(&config.illumination_service) {
            result.add_error(ValidationError::new(
                "illumination_service",
                "Illumination service URL must start with http:// or https://",
            ));
        }

        match &config.backend_url {
            Some(url) if !is_http_url(url) => {
                result.add_error(ValidationError::new(
                    "backend_url",
                    "backend_url must start with http:// or https://",
                ));
            }
            Some(_) => {}
            None => {
                result.add_warning(ValidationWarning::new(
                    "backend_url",
                    "backend_url is not set, alarms will not be resynced from the backend",
                ));
            }
        }
    }

    fn validate_scheduler(config: &DeviceConfig, result: &mut ValidationResult) {
        if config.scheduler_tick_ms == 0 {
            result.add_error(ValidationError::new(
                "scheduler_tick_ms",
                "scheduler_tick_ms must be greater than 0",
            ));
        }
        if config.scheduler_tick_ms > 30_000 {
            result.add_warning(ValidationWarning::new(
                "scheduler_tick_ms",
                "scheduler_tick_ms above 30s may skip minute boundaries",
            ));
        }
        if config.http_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "http_timeout_secs",
                "http_timeout_secs must be greater than 0",
            ));
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
