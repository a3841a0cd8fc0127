//! # DuckDuck HTTP
//!
//! reqwest implementations of the collaborator traits that talk HTTP:
//!
//! - [`IlluminationHttpClient`] - the local illumination service
//! - [`HttpAlarmSource`] - the backend's alarm list for this device

mod alarm_source;
mod error;
mod illumination;

pub use alarm_source::HttpAlarmSource;
pub use error::HttpError;
pub use illumination::IlluminationHttpClient;

use std::time::Duration;

use reqwest::{Client, Url};

/// Build a client with a request timeout.
pub fn build_client(timeout: Duration) -> Result<Client, HttpError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| HttpError::ClientBuild(e.to_string()))
}

/// Check `url` is an absolute http(s) URL and strip trailing slashes.
pub(crate) fn normalize_base_url(url: &str) -> Result<String, HttpError> {
    let parsed = Url::parse(url).map_err(|e| HttpError::InvalidBaseUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(HttpError::InvalidBaseUrl {
            url: url.to_string(),
            message: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(url.trim_end_matches('/').to_string())
}
