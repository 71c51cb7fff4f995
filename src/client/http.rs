//! HTTP client for `POST /api/tips`
//!
//! A proxy in front of the service can answer with 403 or an empty/non-JSON
//! body; in that case the configured direct hosts are tried in order.

use std::time::Duration;

use anyhow::Context;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::ComposeError;
use crate::models::{TipsRequest, TipsRequestBody, TipsResponse};

pub const GENERIC_FAILURE: &str = "Failed to fetch tips. Please try again.";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Compose(#[from] ComposeError),

    /// Message from the service's `{"error": ...}` body, shown verbatim
    #[error("{0}")]
    Server(String),

    #[error("Received an invalid response: {0}")]
    Malformed(String),

    #[error("Failed to fetch tips. Please try again.")]
    Unavailable,
}

enum Attempt {
    Done(Result<TipsResponse, ClientError>),
    TryNext(String),
}

pub struct TipsClient {
    client: reqwest::Client,
    hosts: Vec<String>,
}

impl TipsClient {
    pub fn new(primary: &str, fallback_hosts: Vec<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        let hosts = std::iter::once(primary.to_string())
            .chain(fallback_hosts)
            .map(|host| host.trim_end_matches('/').to_string())
            .collect();

        Ok(Self { client, hosts })
    }

    #[instrument(skip(self, request))]
    pub async fn fetch(&self, request: &TipsRequest) -> Result<TipsResponse, ClientError> {
        let body = TipsRequestBody::from(request);

        for host in &self.hosts {
            match self.attempt(host, &body).await {
                Attempt::Done(result) => return result,
                Attempt::TryNext(reason) => warn!("{} unusable: {}", host, reason),
            }
        }

        Err(ClientError::Unavailable)
    }

    async fn attempt(&self, host: &str, body: &TipsRequestBody) -> Attempt {
        let url = format!("{host}/api/tips");
        debug!("POST {}", url);

        let response = match self.client.post(&url).json(body).send().await {
            Ok(response) => response,
            Err(e) => return Attempt::TryNext(e.to_string()),
        };

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            return Attempt::TryNext("rejected with 403".to_string());
        }

        let text = match response.text().await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => return Attempt::TryNext(format!("empty body with {status}")),
            Err(e) => return Attempt::TryNext(e.to_string()),
        };

        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(_) => return Attempt::TryNext(format!("non-JSON body with {status}")),
        };

        if !status.is_success() {
            let message = value
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            return Attempt::Done(Err(ClientError::Server(message)));
        }

        Attempt::Done(parse_response(value))
    }
}

fn parse_response(value: Value) -> Result<TipsResponse, ClientError> {
    let response: TipsResponse =
        serde_json::from_value(value).map_err(|e| ClientError::Malformed(e.to_string()))?;
    response
        .validate()
        .map_err(|e| ClientError::Malformed(e.to_string()))?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LocationQuery, UnitGroup};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> TipsRequest {
        TipsRequest {
            location: LocationQuery::name("Austin").unwrap(),
            unit_group: UnitGroup::Us,
            focuses: vec![],
        }
    }

    fn day(date: &str) -> Value {
        json!({
            "date": date,
            "weather": {
                "date": date, "tempmin": 70.0, "tempmax": 90.0, "humidity": 40.0,
                "windspeed": 20.0, "precip": 0.0, "description": "Sunny"
            },
            "suggestions": ["one tip", "two tip", "three tip"]
        })
    }

    fn good_body() -> Value {
        json!({
            "location": "Austin",
            "unit_group": "us",
            "days": [day("2024-07-02"), day("2024-07-03"), day("2024-07-04")]
        })
    }

    #[tokio::test]
    async fn test_fetch_posts_request_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tips"))
            .and(body_json(json!({ "location": "Austin", "unit_group": "us" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(good_body()))
            .mount(&server)
            .await;

        let client = TipsClient::new(&server.uri(), vec![]).unwrap();
        let response = client.fetch(&request()).await.unwrap();
        assert_eq!(response.location, "Austin");
        assert_eq!(response.days.len(), 3);
    }

    #[tokio::test]
    async fn test_forbidden_proxy_falls_back_to_direct_host() {
        let proxy = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
            .mount(&proxy)
            .await;

        let empty = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&empty)
            .await;

        let direct = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tips"))
            .respond_with(ResponseTemplate::new(200).set_body_json(good_body()))
            .expect(1)
            .mount(&direct)
            .await;

        let client = TipsClient::new(&proxy.uri(), vec![empty.uri(), direct.uri()]).unwrap();
        let response = client.fetch(&request()).await.unwrap();
        assert_eq!(response.unit_group, UnitGroup::Us);
    }

    #[tokio::test]
    async fn test_service_error_is_verbatim_and_final() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "error": "Location is required" })),
            )
            .mount(&server)
            .await;

        let fallback = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(good_body()))
            .expect(0)
            .mount(&fallback)
            .await;

        let client = TipsClient::new(&server.uri(), vec![fallback.uri()]).unwrap();
        let err = client.fetch(&request()).await.unwrap_err();
        assert_eq!(err.to_string(), "Location is required");
    }

    #[tokio::test]
    async fn test_all_hosts_unusable_gives_generic_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let client = TipsClient::new(&server.uri(), vec![]).unwrap();
        let err = client.fetch(&request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Unavailable));
        assert_eq!(err.to_string(), GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn test_malformed_success_is_rejected_whole() {
        let mut body = good_body();
        body["days"][1]["suggestions"] = json!(["only one"]);

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = TipsClient::new(&server.uri(), vec![]).unwrap();
        let err = client.fetch(&request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Malformed(_)));
    }
}
