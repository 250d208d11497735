//! LLM agent module for PDF text summarisation.
//!
//! [`SummarizerAgent`] turns a [`SummaryRequest`] into a prompt, makes a
//! single call through its [`Backend`] and folds every outcome into a
//! [`SummaryResult`]. No retries are made.

pub use crate::summary::{Summary, SummaryResult};

use crate::config;
use crate::gemini::GeminiBackend;
use crate::options::{SummaryLength, SummaryType};
use crate::prompt::{build_prompt, SummaryRequest};
use crate::summary::PROVIDER;
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Text sent by [`SummarizerAgent::validate_api_key`]
const VALIDATION_TEXT: &str = "This is a test document to verify API connection.";

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("gemini client not initialized: check your API key")]
    NotInitialized,
    #[error("empty text provided for summarization")]
    EmptyText,
    #[error("error during text summarization: {0}")]
    RequestFailed(#[from] BackendError),
    #[error("no response received from Gemini API")]
    EmptyResponse,
}

/// Coarse classification of a failed summarisation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotInitialized,
    InvalidInput,
    RemoteFailure,
    EmptyResponse,
}

impl AgentError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AgentError::NotInitialized => FailureKind::NotInitialized,
            AgentError::EmptyText => FailureKind::InvalidInput,
            AgentError::RequestFailed(_) => FailureKind::RemoteFailure,
            AgentError::EmptyResponse => FailureKind::EmptyResponse,
        }
    }
}

/// A generative-text transport.
///
/// `Ok(None)` means the call went through but produced nothing usable.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str) -> Result<Option<String>, BackendError>;
}

/// The summarisation client.
///
/// Built once per API key. Without a key, or if the backend cannot be
/// constructed, the agent stays uninitialized and every call fails with
/// [`AgentError::NotInitialized`].
pub struct SummarizerAgent<B = GeminiBackend> {
    api_key: Option<String>,
    model_name: String,
    backend: Option<B>,
}

impl SummarizerAgent<GeminiBackend> {
    /// Create a Gemini-backed agent, reading the key from the environment
    /// when none is given
    pub fn new(api_key: Option<String>, model_name: impl Into<String>, timeout: Duration) -> Self {
        let api_key = normalize_key(api_key).or_else(config::env_api_key);
        Self::from_parts(api_key, model_name, |key| GeminiBackend::new(key, timeout))
    }
}

impl<B: Backend> SummarizerAgent<B> {
    /// Create an agent with a custom backend.
    ///
    /// `factory` only runs when a non-blank key is present.
    pub fn from_parts<F>(api_key: Option<String>, model_name: impl Into<String>, factory: F) -> Self
    where
        F: FnOnce(&str) -> Result<B, BackendError>,
    {
        let api_key = normalize_key(api_key);
        let model_name = model_name.into();

        let backend = match api_key.as_deref() {
            None => {
                warn!("no API key provided");
                None
            }
            Some(key) => match factory(key) {
                Ok(backend) => {
                    info!(model = %model_name, "gemini client initialized");
                    Some(backend)
                }
                Err(e) => {
                    error!(error = %e, "error initializing gemini client");
                    None
                }
            },
        };

        Self {
            api_key,
            model_name,
            backend,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.backend.is_some()
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Summarise `text` with the given options
    pub async fn summarize(
        &self,
        text: &str,
        summary_type: SummaryType,
        focus_areas: &[String],
        summary_length: SummaryLength,
    ) -> SummaryResult {
        let request =
            SummaryRequest::new(text, summary_type, summary_length, focus_areas.to_vec());
        self.summarize_request(&request).await
    }

    /// Summarise a prepared request
    pub async fn summarize_request(&self, request: &SummaryRequest) -> SummaryResult {
        let backend = self.backend.as_ref().ok_or(AgentError::NotInitialized)?;

        if !request.has_content() {
            return Err(AgentError::EmptyText);
        }

        let prompt = build_prompt(request);

        let text = match backend.generate(&self.model_name, &prompt).await {
            Ok(Some(text)) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!(model = %self.model_name, "no text in model response");
                return Err(AgentError::EmptyResponse);
            }
            Err(e) => {
                error!(error = %e, "error during text summarization");
                return Err(AgentError::RequestFailed(e));
            }
        };

        let summary = Summary {
            provider: PROVIDER.to_string(),
            model: self.model_name.clone(),
            summary_type: request.summary_type,
            summary_length: request.summary_length,
            focus_areas: request.focus_areas.clone(),
            timestamp: Utc::now(),
            original_text_length: request.text.chars().count(),
            summary_text_length: text.chars().count(),
            summary: text,
        };

        info!(
            summary_type = %summary.summary_type,
            chars = summary.summary_text_length,
            "text summarization completed"
        );
        Ok(summary)
    }

    /// Check the key by making one short summarisation call.
    ///
    /// This spends a real request against the API quota.
    pub async fn validate_api_key(&self) -> bool {
        if self.api_key.is_none() {
            return false;
        }

        match self
            .summarize(VALIDATION_TEXT, SummaryType::General, &[], SummaryLength::Short)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                error!(error = %e, "API key validation failed");
                false
            }
        }
    }

    pub fn get_supported_summary_types(&self) -> Vec<&'static str> {
        SummaryType::ALL.iter().map(|t| t.as_str()).collect()
    }

    pub fn get_supported_lengths(&self) -> Vec<&'static str> {
        SummaryLength::ALL.iter().map(|l| l.as_str()).collect()
    }
}

fn normalize_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    enum Reply {
        Text(&'static str),
        Nothing,
        Fail(&'static str),
    }

    #[derive(Clone)]
    struct StubBackend {
        reply: Reply,
        calls: Arc<AtomicUsize>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl StubBackend {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: Arc::new(AtomicUsize::new(0)),
                prompts: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Backend for StubBackend {
        async fn generate(
            &self,
            _model: &str,
            prompt: &str,
        ) -> Result<Option<String>, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Reply::Text(t) => Ok(Some(t.to_string())),
                Reply::Nothing => Ok(None),
                Reply::Fail(msg) => Err(BackendError::Other(msg.to_string())),
            }
        }
    }

    fn agent(key: Option<&str>, stub: &StubBackend) -> SummarizerAgent<StubBackend> {
        let stub = stub.clone();
        SummarizerAgent::from_parts(key.map(str::to_string), DEFAULT_MODEL, move |_| Ok(stub))
    }

    #[tokio::test]
    async fn uninitialized_agent_never_calls_backend() {
        let stub = StubBackend::new(Reply::Text("unused"));
        for key in [None, Some(""), Some("   ")] {
            let agent = agent(key, &stub);
            assert!(!agent.is_initialized());
            let result = agent
                .summarize("Some text", SummaryType::General, &[], SummaryLength::Medium)
                .await;
            let err = result.unwrap_err();
            assert_eq!(err.kind(), FailureKind::NotInitialized);
            assert!(err.to_string().contains("client not initialized"));
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn failed_backend_construction_leaves_agent_uninitialized() {
        let agent: SummarizerAgent<StubBackend> =
            SummarizerAgent::from_parts(Some("key".into()), DEFAULT_MODEL, |_| {
                Err(BackendError::Other("tls unavailable".into()))
            });
        assert!(!agent.is_initialized());
        assert_eq!(agent.api_key(), Some("key"));
        let err = agent
            .summarize("text", SummaryType::General, &[], SummaryLength::Medium)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::NotInitialized);
    }

    #[tokio::test]
    async fn blank_text_is_rejected_before_calling_backend() {
        let stub = StubBackend::new(Reply::Text("unused"));
        let agent = agent(Some("key"), &stub);
        for text in ["", "   ", "\n\t"] {
            let err = agent
                .summarize(text, SummaryType::Executive, &[], SummaryLength::Long)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), FailureKind::InvalidInput);
            assert!(err.to_string().contains("empty text"));
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn backend_failure_is_reported_with_detail() {
        let stub = StubBackend::new(Reply::Fail("quota exceeded for project"));
        let agent = agent(Some("key"), &stub);
        let err = agent
            .summarize("Some text", SummaryType::General, &[], SummaryLength::Medium)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::RemoteFailure);
        assert!(err.to_string().contains("quota exceeded for project"));
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn empty_response_is_reported() {
        for reply in [Reply::Nothing, Reply::Text(""), Reply::Text("  \n")] {
            let stub = StubBackend::new(reply);
            let agent = agent(Some("key"), &stub);
            let err = agent
                .summarize("Some text", SummaryType::General, &[], SummaryLength::Medium)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), FailureKind::EmptyResponse);
            assert!(err.to_string().contains("no response received"));
            assert_eq!(stub.calls(), 1);
        }
    }

    #[tokio::test]
    async fn successful_call_fills_summary_metadata() {
        let stub = StubBackend::new(Reply::Text("• fox summary"));
        let agent = agent(Some("key"), &stub);
        let summary = agent
            .summarize(
                "The quick brown fox.",
                SummaryType::BulletPoints,
                &[],
                SummaryLength::Short,
            )
            .await
            .unwrap();

        assert_eq!(summary.summary, "• fox summary");
        assert_eq!(summary.provider, PROVIDER);
        assert_eq!(summary.model, DEFAULT_MODEL);
        assert_eq!(summary.summary_type, SummaryType::BulletPoints);
        assert_eq!(summary.summary_length, SummaryLength::Short);
        assert!(summary.focus_areas.is_empty());
        assert_eq!(summary.original_text_length, 20);
        assert_eq!(summary.summary_text_length, 13);
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn sends_the_built_prompt() {
        let stub = StubBackend::new(Reply::Text("ok"));
        let agent = agent(Some("key"), &stub);
        let focus = vec!["Methodology".to_string()];
        let summary = agent
            .summarize("Body text", SummaryType::Technical, &focus, SummaryLength::Long)
            .await
            .unwrap();
        assert_eq!(summary.focus_areas, focus);

        let expected = build_prompt(&SummaryRequest::new(
            "Body text",
            SummaryType::Technical,
            SummaryLength::Long,
            focus,
        ));
        assert_eq!(stub.prompts.lock().unwrap().as_slice(), &[expected]);
    }

    #[tokio::test]
    async fn validate_api_key_reflects_summarize_outcome() {
        let ok = StubBackend::new(Reply::Text("fine"));
        assert!(agent(Some("key"), &ok).validate_api_key().await);
        assert_eq!(ok.calls(), 1);
        let sent = ok.prompts.lock().unwrap()[0].clone();
        assert!(sent.contains(VALIDATION_TEXT));
        assert!(sent.contains(SummaryLength::Short.instruction()));

        let failing = StubBackend::new(Reply::Fail("401 unauthorized"));
        assert!(!agent(Some("key"), &failing).validate_api_key().await);

        let empty = StubBackend::new(Reply::Nothing);
        assert!(!agent(Some("key"), &empty).validate_api_key().await);

        let unused = StubBackend::new(Reply::Text("fine"));
        assert!(!agent(None, &unused).validate_api_key().await);
        assert_eq!(unused.calls(), 0);
    }

    #[test]
    fn supported_lists_match_options() {
        let stub = StubBackend::new(Reply::Nothing);
        let agent = agent(None, &stub);
        assert_eq!(
            agent.get_supported_summary_types(),
            vec![
                "general",
                "bullet_points",
                "executive",
                "technical",
                "academic",
                "key_insights",
                "action_items"
            ]
        );
        assert_eq!(agent.get_supported_lengths(), vec!["short", "medium", "long"]);
        for name in agent.get_supported_summary_types() {
            assert_eq!(SummaryType::from_name_or_default(name).as_str(), name);
        }
    }

    #[test]
    fn trims_supplied_key() {
        let stub = StubBackend::new(Reply::Nothing);
        let agent = agent(Some("  abc  "), &stub);
        assert_eq!(agent.api_key(), Some("abc"));
        assert!(agent.is_initialized());
    }
}
