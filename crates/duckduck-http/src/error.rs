//! HTTP client setup errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_base_url_error() {
        let err = HttpError::InvalidBaseUrl {
            url: "localhost".to_string(),
            message: "relative URL without a base".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("localhost"));
        assert!(display.contains("relative URL"));
    }

    #[test]
    fn test_client_build_error() {
        let err = HttpError::ClientBuild("tls backend".to_string());
        assert!(err.to_string().contains("tls backend"));
    }
}
