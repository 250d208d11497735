//! Google Gemini transport.
//!
//! Uses reqwest against the `generateContent` REST endpoint.

use crate::agent::{Backend, BackendError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// User-Agent string identifying this client
const USER_AGENT: &str = concat!("summa-pdf/", env!("CARGO_PKG_VERSION"));

/// Base URL of the Generative Language API
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// Single-shot text generation against Gemini.
pub struct GeminiBackend {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiBackend {
    /// Build a backend for `api_key`; `timeout` bounds each request
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// Point the backend at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl Backend for GeminiBackend {
    async fn generate(&self, model: &str, prompt: &str) -> Result<Option<String>, BackendError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        parse_response(&body)
    }
}

/// Pull the generated text out of a `generateContent` response body.
///
/// Returns `None` when the first candidate carries no text parts.
fn parse_response(body: &str) -> Result<Option<String>, BackendError> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

/// Prefer the API's own error message over the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_text_parts_of_first_candidate() {
        let body = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "• fox "}, {"text": "summary"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;
        assert_eq!(parse_response(body).unwrap().as_deref(), Some("• fox summary"));
    }

    #[test]
    fn missing_candidates_yield_no_text() {
        assert_eq!(parse_response("{}").unwrap(), None);
        assert_eq!(
            parse_response(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap(),
            None
        );
        assert_eq!(
            parse_response(r#"{"candidates": [{"content": {"parts": []}}]}"#).unwrap(),
            None
        );
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        assert!(matches!(
            parse_response("<html>bad gateway</html>"),
            Err(BackendError::Decode(_))
        ));
    }

    #[test]
    fn extracts_api_error_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(body), "API key not valid.");
        assert_eq!(error_message("quota exceeded\n"), "quota exceeded");
    }

    #[test]
    fn builds_generate_content_endpoint() {
        let backend = GeminiBackend::new("key", Duration::from_secs(5))
            .unwrap()
            .with_base_url("http://localhost:8080/v1beta/");
        assert_eq!(
            backend.endpoint("gemini-1.5-flash"),
            "http://localhost:8080/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
