//! Oracle transports: the real Gemini HTTP client and a scripted mock.

use crate::errors::OracleError;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::debug;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_TEMPERATURE: f64 = 0.2;

/// Text-in, text-out boundary to the decision oracle.
#[async_trait]
pub trait OracleTransport: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, OracleError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
}

/// Gemini `generateContent` client.
pub struct GeminiTransport {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f64,
}

impl GeminiTransport {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        )
    }
}

#[async_trait]
impl OracleTransport for GeminiTransport {
    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(self.url())
            .json(&body)
            .send()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let detail = response.text().await.unwrap_or_default();
            return Err(OracleError::Quota(format!("429: {detail}")));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(OracleError::Transport(format!("{status}: {detail}")));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;
        debug!(model = %self.model, "oracle response received");

        extract_text(&payload)
            .ok_or_else(|| OracleError::Transport("provider response carried no text".to_string()))
    }
}

/// Pull the first candidate's text out of a `generateContent` response.
fn extract_text(payload: &Value) -> Option<String> {
    payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(str::to_string)
}

/// Scripted transport for tests and dry runs: replays queued results in
/// order and counts calls.
#[derive(Default)]
pub struct MockOracle {
    responses: Mutex<VecDeque<Result<String, OracleError>>>,
    calls: AtomicU32,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, response: impl Into<String>) {
        self.responses.lock().push_back(Ok(response.into()));
    }

    pub fn push_err(&self, error: OracleError) {
        self.responses.lock().push_back(Err(error));
    }

    /// Builder-style queueing for test setup.
    pub fn with_ok(self, response: impl Into<String>) -> Self {
        self.push_ok(response);
        self
    }

    pub fn with_err(self, error: OracleError) -> Self {
        self.push_err(error);
        self
    }

    /// Number of `generate` calls observed.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OracleTransport for MockOracle {
    async fn generate(&self, _prompt: &str) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.responses.lock().pop_front() {
            Some(result) => result,
            None => Err(OracleError::Transport("script exhausted".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_text_from_candidate_shape() {
        let payload = json!({
            "candidates": [
                { "content": { "parts": [ { "text": "{\"status\": \"ACHIEVED\"}" } ] } }
            ]
        });
        assert_eq!(
            extract_text(&payload).as_deref(),
            Some("{\"status\": \"ACHIEVED\"}")
        );
        assert_eq!(extract_text(&json!({"candidates": []})), None);
        assert_eq!(extract_text(&json!({})), None);
    }

    #[test]
    fn test_gemini_url_shape() {
        let transport = GeminiTransport::new("key123").with_model("gemini-1.5-pro");
        assert_eq!(
            transport.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:generateContent?key=key123"
        );
    }

    #[tokio::test]
    async fn test_mock_replays_in_order() {
        let oracle = MockOracle::new()
            .with_ok("first")
            .with_err(OracleError::Quota("429".to_string()));

        assert_eq!(oracle.generate("p").await.unwrap(), "first");
        assert!(oracle.generate("p").await.unwrap_err().is_quota());
        assert!(oracle.generate("p").await.is_err());
        assert_eq!(oracle.calls(), 3);
    }
}
