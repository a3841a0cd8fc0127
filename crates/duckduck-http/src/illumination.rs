//! Illumination service client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

use duckduck_protocols::{IlluminationClient, IlluminationError};

use crate::{HttpError, build_client, normalize_base_url};

/// Posts lighting instructions as JSON to `{base_url}/{endpoint}`.
#[derive(Debug, Clone)]
pub struct IlluminationHttpClient {
    base_url: String,
    client: Client,
}

impl IlluminationHttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, HttpError> {
        Ok(Self::with_client(normalize_base_url(base_url)?, build_client(timeout)?))
    }

    /// Use an existing client. `base_url` is taken as is.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post(&self, endpoint: &str, body: &Value) -> Result<String, IlluminationError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("POST {} {}", url, body);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| IlluminationError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| IlluminationError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(IlluminationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }
}

fn require_object(endpoint: &str, data: &Value) -> Result<(), IlluminationError> {
    if data.is_object() {
        Ok(())
    } else {
        Err(IlluminationError::InvalidInstruction(format!(
            "{} instruction must be a JSON object, got {}",
            endpoint, data
        )))
    }
}

#[async_trait]
impl IlluminationClient for IlluminationHttpClient {
    async fn set_hsl(&self, data: Value) -> Result<String, IlluminationError> {
        require_object("hsl", &data)?;
        self.post("hsl", &data).await
    }

    async fn set_cct(&self, data: Value) -> Result<String, IlluminationError> {
        require_object("cct", &data)?;
        self.post("cct", &data).await
    }

    async fn set_power(&self, on: bool) -> Result<String, IlluminationError> {
        self.post("power", &json!({ "on": on })).await
    }

    async fn dim(&self) -> Result<String, IlluminationError> {
        self.post("dim", &json!({})).await
    }

    async fn start_sunrise(&self, time_unit: f64) -> Result<String, IlluminationError> {
        self.post("sunrise", &json!({ "time_unit": time_unit })).await
    }
}

#[cfg(test)]
#[path = "illumination_tests.rs"]
mod tests;
