use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use reqwest::Client;
use std::time::Duration;
use crate::config::Config;
use crate::error::{Result, AppError};

/// A generative-text capability: one prompt in, generated text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
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

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str, endpoint: &str) -> Result<Self> {
        // No request timeout: a slow upstream is request latency.
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: api_key.to_string(),
            model: model.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.google_api_key, &config.gemini_model, &config.gemini_endpoint)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt.to_string() }],
            }],
        };

        let res = self
            .http
            .post(self.request_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::UpstreamGeneration(e.to_string()))?;

        let status = res.status();
        let raw = res
            .text()
            .await
            .map_err(|e| AppError::UpstreamGeneration(e.to_string()))?;

        if !status.is_success() {
            return Err(AppError::UpstreamGeneration(upstream_error_message(status, &raw)));
        }

        let payload: GenerateContentResponse = serde_json::from_str(&raw)
            .map_err(|e| AppError::UpstreamGeneration(format!("Invalid response format from Gemini: {}", e)))?;

        Ok(extract_text(payload))
    }
}

fn upstream_error_message(status: reqwest::StatusCode, raw: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(raw) {
        Ok(envelope) => envelope.error.message,
        Err(_) => format!("Gemini returned {}: {}", status, raw.trim()),
    }
}

/// Concatenates the text parts of the first candidate. A response with no
/// text (e.g. blocked by safety filters) yields an empty string.
fn extract_text(payload: GenerateContentResponse) -> String {
    payload
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_targets_model() {
        let client = GeminiClient::new("key", "gemini-2.0-flash", "https://example.test/v1beta/").unwrap();
        assert_eq!(
            client.request_url(),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn text_parts_of_first_candidate_are_joined() {
        let payload: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[
                {"content":{"parts":[{"text":"Hello "},{"text":"world"}]}},
                {"content":{"parts":[{"text":"ignored"}]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(payload), "Hello world");
    }

    #[test]
    fn missing_candidates_yield_empty_text() {
        let payload: GenerateContentResponse = serde_json::from_str(r#"{"promptFeedback":{}}"#).unwrap();
        assert_eq!(extract_text(payload), "");
    }

    #[test]
    fn provider_error_message_is_surfaced() {
        let raw = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            upstream_error_message(reqwest::StatusCode::BAD_REQUEST, raw),
            "API key not valid. Please pass a valid API key."
        );
    }

    #[test]
    fn unstructured_error_body_keeps_status() {
        let msg = upstream_error_message(reqwest::StatusCode::BAD_GATEWAY, "upstream down\n");
        assert_eq!(msg, "Gemini returned 502 Bad Gateway: upstream down");
    }
}
