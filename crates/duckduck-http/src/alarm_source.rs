//! Backend alarm list.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use duckduck_protocols::{Alarm, AlarmSource, SourceError};

use crate::{HttpError, build_client, normalize_base_url};

/// Fetches `GET {backend_url}/devices/{device_code}/alarms`.
///
/// The device key is sent as a bearer token when non-empty. The response
/// is either a bare JSON array of alarms or an object with an `alarms`
/// array.
#[derive(Debug, Clone)]
pub struct HttpAlarmSource {
    client: Client,
    url: String,
    device_key: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AlarmList {
    Bare(Vec<Value>),
    Wrapped { alarms: Vec<Value> },
}

impl AlarmList {
    fn into_entries(self) -> Vec<Value> {
        match self {
            AlarmList::Bare(entries) | AlarmList::Wrapped { alarms: entries } => entries,
        }
    }
}

/// Decode each entry on its own; malformed records are logged and skipped
/// so the rest of the list still schedules.
fn decode_alarms(entries: Vec<Value>) -> Vec<Alarm> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Alarm>(entry) {
            Ok(alarm) => Some(alarm),
            Err(e) => {
                warn!("Skipping malformed alarm at index {}: {}", index, e);
                None
            }
        })
        .collect()
}

impl HttpAlarmSource {
    pub fn new(
        backend_url: &str,
        device_code: &str,
        device_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, HttpError> {
        let base = normalize_base_url(backend_url)?;
        Ok(Self {
            client: build_client(timeout)?,
            url: format!("{}/devices/{}/alarms", base, device_code),
            device_key: device_key.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AlarmSource for HttpAlarmSource {
    async fn fetch_alarms(&self) -> Result<Vec<Alarm>, SourceError> {
        debug!("GET {}", self.url);

        let mut request = self.client.get(&self.url);
        if !self.device_key.is_empty() {
            request = request.bearer_auth(&self.device_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let list: AlarmList = serde_json::from_slice(&body).map_err(|_| {
            SourceError::InvalidPayload(
                "expected an array of alarms or an object with an `alarms` array".to_string(),
            )
        })?;
        Ok(decode_alarms(list.into_entries()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

    fn alarm_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "active": true,
            "wakeTime": {"h": 7, "m": 0},
            "bedTime": {"h": 22, "m": 0},
            "repeatDays": ["mon", "fri"],
            "sunrise": null
        })
    }

    fn source_for(server: &MockServer, key: &str) -> HttpAlarmSource {
        HttpAlarmSource::new(&server.uri(), "SSAC78", key, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_url() {
        let source = HttpAlarmSource::new(
            "https://api.example.com/",
            "SSAC78",
            "k",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(source.url(), "https://api.example.com/devices/SSAC78/alarms");
    }

    #[tokio::test]
    async fn test_fetch_bare_list_in_order() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/devices/SSAC78/alarms"))
            .and(matchers::header("Authorization", "Bearer secret"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([alarm_json("2"), alarm_json("1")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let alarms = source_for(&server, "secret").fetch_alarms().await.unwrap();
        let ids: Vec<&str> = alarms.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn test_fetch_wrapped_list() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"alarms": [alarm_json("9")]})),
            )
            .mount(&server)
            .await;

        let alarms = source_for(&server, "").fetch_alarms().await.unwrap();
        assert_eq!(alarms.len(), 1);
        assert_eq!(alarms[0].id, "9");
    }

    #[tokio::test]
    async fn test_fetch_skips_malformed_entries() {
        let server = MockServer::start().await;

        let mut out_of_range = alarm_json("2");
        out_of_range["wakeTime"] = json!({"h": 25, "m": 0});
        let mut bad_day = alarm_json("3");
        bad_day["repeatDays"] = json!(["mon", "blursday"]);
        let missing_field = json!({"id": "4", "active": true});

        Mock::given(matchers::method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                alarm_json("1"),
                out_of_range,
                bad_day,
                missing_field,
                alarm_json("5")
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let alarms = source_for(&server, "k").fetch_alarms().await.unwrap();
        let ids: Vec<&str> = alarms.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "5"]);
    }

    #[test]
    fn test_decode_alarms_keeps_valid_entries() {
        let mut bad = alarm_json("2");
        bad["bedTime"] = json!({"h": 22, "m": 75});
        let alarms = decode_alarms(vec![bad, alarm_json("1")]);
        assert_eq!(alarms.len(), 1);
        assert_eq!(alarms[0].id, "1");
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let result = source_for(&server, "wrong").fetch_alarms().await;
        assert!(matches!(result, Err(SourceError::Status { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_fetch_invalid_payload() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
            .mount(&server)
            .await;

        let result = source_for(&server, "k").fetch_alarms().await;
        assert!(matches!(result, Err(SourceError::InvalidPayload(_))));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_backend() {
        let source =
            HttpAlarmSource::new("http://127.0.0.1:1", "SSAC78", "k", Duration::from_millis(500))
                .unwrap();
        let result = source.fetch_alarms().await;
        assert!(matches!(result, Err(SourceError::Unavailable(_))));
    }
}
