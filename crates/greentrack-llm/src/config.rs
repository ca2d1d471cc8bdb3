//! Backend settings resolved from the chat configuration and environment.

use std::time::Duration;

use greentrack_core::ChatConfig;
use tracing::warn;

/// Everything the HTTP backend needs for one request.
#[derive(Clone, PartialEq)]
pub struct BackendConfig {
    /// Completion endpoint URL, validated when a request is built.
    pub endpoint: String,
    /// Bearer token, if one was found in the environment.
    pub api_key: Option<String>,
    /// Variable the key is read from, named in the missing-key message.
    pub api_key_env: String,
    /// Model identifier.
    pub model: String,
    /// Upper bound on reply length.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl BackendConfig {
    /// Resolve from the chat configuration, reading the API key from the
    /// variable named by `api_key_env`.
    pub fn from_chat_config(chat: &ChatConfig) -> Self {
        Self::from_chat_config_with(chat, |key| std::env::var(key).ok())
    }

    /// Resolve from the chat configuration with an arbitrary variable lookup.
    pub fn from_chat_config_with(
        chat: &ChatConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let api_key = lookup(&chat.api_key_env).filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            warn!(
                variable = %chat.api_key_env,
                "No API key in the environment; chat replies will report the missing key"
            );
        }
        Self {
            endpoint: chat.endpoint.clone(),
            api_key,
            api_key_env: chat.api_key_env.clone(),
            model: chat.model.clone(),
            max_tokens: chat.max_tokens,
            temperature: chat.temperature,
            timeout: Duration::from_millis(chat.request_timeout_ms),
        }
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_env", &self.api_key_env)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}
