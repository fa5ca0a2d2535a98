//! HTTP client for an OpenAI-compatible chat-completion gateway.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GatewayConfig;

/// Gateway failures. The `Display` text is the user-facing reason.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("AI service is not configured")]
    NotConfigured,

    #[error("AI service could not be reached")]
    Transport(#[source] reqwest::Error),

    #[error("AI service did not respond in time")]
    Timeout,

    #[error("AI service is temporarily busy")]
    RateLimited,

    #[error("AI usage limit reached")]
    QuotaExceeded,

    #[error("AI service is temporarily unavailable")]
    Unavailable(u16),

    #[error("AI service returned an unexpected response")]
    Malformed,

    /// An `error` field in an otherwise well-formed response.
    #[error("{0}")]
    Upstream(String),
}

impl GatewayError {
    /// HTTP status to report to our own clients for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::RateLimited => 429,
            Self::QuotaExceeded => 402,
            _ => 500,
        }
    }

    fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(e)
        }
    }
}

/// Something that turns a system instruction and a user message into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system: &str, user: &str) -> Result<String, GatewayError>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn generate(&self, system: &str, user: &str) -> Result<String, GatewayError> {
        (**self).generate(system, user).await
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [WireMessage<'a>; 2],
    stream: bool,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completion client.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: Client,
}

impl GatewayClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GatewayError::Transport)?;
        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl TextGenerator for GatewayClient {
    async fn generate(&self, system: &str, user: &str) -> Result<String, GatewayError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::error!("AI gateway API key is not configured");
            return Err(GatewayError::NotConfigured);
        };

        let request = CompletionRequest {
            model: &self.model,
            messages: [
                WireMessage {
                    role: "system",
                    content: system,
                },
                WireMessage {
                    role: "user",
                    content: user,
                },
            ],
            stream: false,
        };

        tracing::debug!(model = %self.model, "Sending request to AI gateway");
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(GatewayError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "AI gateway error");
            return Err(match status.as_u16() {
                429 => GatewayError::RateLimited,
                402 => GatewayError::QuotaExceeded,
                code => GatewayError::Unavailable(code),
            });
        }

        let bytes = response.bytes().await.map_err(GatewayError::from_reqwest)?;
        let body: CompletionResponse = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(error = %e, "AI gateway returned malformed JSON");
            GatewayError::Malformed
        })?;

        if let Some(error) = body.error {
            return Err(GatewayError::Upstream(error_message(&error)));
        }

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GatewayError::Malformed)?;

        tracing::info!("AI response received successfully");
        Ok(content)
    }
}

/// Pull a readable message out of an `error` field, which gateways send
/// either as a string or as `{ "message": ... }`.
fn error_message(error: &serde_json::Value) -> String {
    match error {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(map) => map
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        other => other.to_string(),
    }
}
