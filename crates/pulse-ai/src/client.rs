//! Thin wrapper over the Anthropic Messages API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AiError;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    content: Vec<ContentBlock>,
}

/// Client for single-turn text completions against Claude models.
///
/// Cloning is cheap: the inner `reqwest::Client` is a shared handle.
#[derive(Clone)]
pub struct ClaudeClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ClaudeClient {
    /// Builds a client with the given API key and per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Http`] if the underlying client cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.to_owned(),
            base_url: ANTHROPIC_API_URL.to_owned(),
        })
    }

    /// Overrides the API origin; used by tests to point at a local server.
    #[must_use]
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = format!("{}/v1", url.trim_end_matches('/'));
        self
    }

    fn headers(&self) -> Result<HeaderMap, AiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key).map_err(|_| AiError::Api {
                status: 0,
                message: "API key contains invalid header characters".to_owned(),
            })?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Sends a single user prompt and returns the first text block of the
    /// response.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Api`] for non-2xx responses, [`AiError::Http`] for
    /// transport failures, and [`AiError::EmptyResponse`] when the model
    /// returns no text.
    pub async fn complete(
        &self,
        model: &str,
        max_tokens: u32,
        prompt: &str,
    ) -> Result<String, AiError> {
        let url = format!("{}/messages", self.base_url);
        let request = ChatRequest {
            model,
            max_tokens,
            messages: vec![WireMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model, max_tokens, "claude completion request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json().await?;
        body.content
            .into_iter()
            .find_map(|block| block.text)
            .map(|text| text.trim().to_owned())
            .ok_or(AiError::EmptyResponse)
    }
}
