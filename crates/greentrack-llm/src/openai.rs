//! OpenAI-compatible chat completions backend.
//!
//! Sends the system instruction and the user's message as a two-message
//! conversation and returns `choices[0].message.content`. Each stage of the
//! exchange maps to its own [`CompletionError`] variant so the transcript
//! can say what went wrong.

use std::future::Future;

use greentrack_core::{CompletionError, CompletionRequest, CompletionService};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::BackendConfig;

/// A message in the request body.
#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// The request body.
#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: [WireMessage<'a>; 2],
    max_tokens: u32,
    temperature: f64,
}

/// Backend for OpenAI-compatible chat completion endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    client: reqwest::Client,
    config: BackendConfig,
}

impl OpenAiBackend {
    /// Create a backend for the given settings.
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// The settings in use.
    pub const fn config(&self) -> &BackendConfig {
        &self.config
    }

    async fn send(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let url = reqwest::Url::parse(&self.config.endpoint).map_err(|e| {
            CompletionError::Setup {
                reason: format!("invalid endpoint {:?}: {e}", self.config.endpoint),
            }
        })?;
        let Some(key) = self.config.api_key.as_deref() else {
            warn!(variable = %self.config.api_key_env, "Completion skipped: no API key");
            return Err(CompletionError::MissingCredentials {
                variable: self.config.api_key_env.clone(),
            });
        };
        let body = encode_body(&self.config, request)?;

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .timeout(self.config.timeout)
            .bearer_auth(key)
            .body(body)
            .send()
            .await.map_err(|e| transport_error(&e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| transport_error(&e))?;
        debug!(status = status.as_u16(), body = %text, "Completion response received");

        if !status.is_success() {
            warn!(status = status.as_u16(), "Completion service rejected the request");
            return Err(CompletionError::Rejected {
                status: status.as_u16(),
            });
        }

        let json: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| CompletionError::Decode {
                reason: e.to_string(),
            })?;
        extract_content(&json)
    }
}

impl CompletionService for OpenAiBackend {
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send {
        self.send(request)
    }
}

/// Encode the JSON request body.
fn encode_body(
    config: &BackendConfig,
    request: &CompletionRequest,
) -> Result<Vec<u8>, CompletionError> {
    let wire = WireRequest {
        model: &config.model,
        messages: [
            WireMessage {
                role: "system",
                content: &request.system,
            },
            WireMessage {
                role: "user",
                content: &request.user,
            },
        ],
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    };
    serde_json::to_vec(&wire).map_err(|e| CompletionError::Serialization {
        reason: e.to_string(),
    })
}

fn transport_error(e: &reqwest::Error) -> CompletionError {
    let reason = if e.is_timeout() {
        "request timed out".to_owned()
    } else {
        e.to_string()
    };
    CompletionError::Transport { reason }
}

/// Extract the reply text from a chat completions response.
fn extract_content(json: &serde_json::Value) -> Result<String, CompletionError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or(CompletionError::Empty)
}
