//! Google Generative Language (Gemini) client

use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::{Prompt, SuggestionModel};
use crate::config::LlmConfig;
use crate::error::WeatherWiseError;

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, config: &LlmConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SuggestionModel for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn complete(&self, prompt: &Prompt) -> crate::Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part {
                        text: &prompt.system,
                    },
                    Part { text: &prompt.user },
                ],
            }],
        };

        let start_time = Instant::now();
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| WeatherWiseError::llm(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherWiseError::llm(format!(
                "Gemini returned {}",
                status.as_u16()
            )));
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| WeatherWiseError::llm(format!("Invalid Gemini response: {e}")))?;

        let elapsed = start_time.elapsed();
        debug!("Gemini replied in {:.3}s", elapsed.as_secs_f64());
        if elapsed.as_secs() > 5 {
            warn!("Slow Gemini response: {:.3}s", elapsed.as_secs_f64());
        }

        reply
            .text()
            .ok_or_else(|| WeatherWiseError::llm("Gemini reply had no text"))
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn text(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let text: String = parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GeminiClient {
        let config = LlmConfig {
            base_url: server.uri(),
            ..LlmConfig::default()
        };
        GeminiClient::new("test_key".to_string(), &config).unwrap()
    }

    fn prompt() -> Prompt {
        Prompt {
            system: "system text".to_string(),
            user: "user text".to_string(),
        }
    }

    #[tokio::test]
    async fn test_complete_joins_candidate_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test_key"))
            .and(body_partial_json(json!({
                "contents": [{ "parts": [{ "text": "system text" }, { "text": "user text" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [
                        { "text": "{\"suggestions\": " },
                        { "text": "[\"a\", \"b\", \"c\"]}" }
                    ]}
                }]
            })))
            .mount(&server)
            .await;

        let text = client_for(&server).complete(&prompt()).await.unwrap();
        assert_eq!(text, "{\"suggestions\": [\"a\", \"b\", \"c\"]}");
    }

    #[tokio::test]
    async fn test_error_status_is_llm_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = client_for(&server).complete(&prompt()).await.unwrap_err();
        assert!(matches!(err, WeatherWiseError::Llm { .. }));
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_empty_candidates_is_llm_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let err = client_for(&server).complete(&prompt()).await.unwrap_err();
        assert!(err.to_string().contains("no text"));
    }
}
