//! Configuration loading and typed config structures for GreenTrack.
//!
//! The configuration lives in `greentrack-config.yaml` next to the binary
//! (or wherever `--config` points). Every field has a default, so a missing
//! file or a partial file is fine. A few settings can be overridden from the
//! environment:
//!
//! | Variable                   | Field            |
//! |----------------------------|------------------|
//! | `GREENTRACK_CHAT_ENDPOINT` | `chat.endpoint`  |
//! | `GREENTRACK_CHAT_MODEL`    | `chat.model`     |
//! | `GREENTRACK_LOG_LEVEL`     | `logging.level`  |
//!
//! The API key is never part of the file. `chat.api_key_env` only names the
//! variable it is read from.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Which setting is wrong and why.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level application configuration.
///
/// Mirrors the structure of `greentrack-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    /// Swipe thresholds.
    #[serde(default)]
    pub gesture: GestureConfig,

    /// Splash and intro timing.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Screen flow policy.
    #[serde(default)]
    pub flow: FlowConfig,

    /// Chat completion settings.
    #[serde(default)]
    pub chat: ChatConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// External content file. The embedded content is used when absent.
    #[serde(default)]
    pub content_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from a YAML file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Like [`AppConfig::from_file`], but a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_file`] for any failure other than "not found".
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match Self::from_file(path) {
            Err(ConfigError::Io { source }) if source.kind() == std::io::ErrorKind::NotFound => {
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup, keyed by variable name.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("GREENTRACK_CHAT_ENDPOINT") {
            self.chat.endpoint = val;
        }
        if let Some(val) = lookup("GREENTRACK_CHAT_MODEL") {
            self.chat.model = val;
        }
        if let Some(val) = lookup("GREENTRACK_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    /// Check value ranges that the types alone cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.gesture;
        if !(g.preview_threshold.is_finite() && g.preview_threshold >= 0.0) {
            return Err(invalid("gesture.preview_threshold must be a non-negative number"));
        }
        if !(g.commit_threshold.is_finite() && g.commit_threshold >= g.preview_threshold) {
            return Err(invalid(
                "gesture.commit_threshold must be a number no smaller than the preview threshold",
            ));
        }
        if !(g.preview_fade_distance.is_finite() && g.preview_fade_distance > 0.0) {
            return Err(invalid("gesture.preview_fade_distance must be positive"));
        }
        if self.timing.intro_word_interval_ms == 0 {
            return Err(invalid("timing.intro_word_interval_ms must be positive"));
        }
        if !(0.0..=2.0).contains(&self.chat.temperature) {
            return Err(invalid("chat.temperature must be within 0.0..=2.0"));
        }
        if self.chat.max_tokens == 0 {
            return Err(invalid("chat.max_tokens must be positive"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

/// Swipe gesture thresholds, in points of horizontal drag.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GestureConfig {
    /// Distance beyond which the choice label is previewed.
    #[serde(default = "default_preview_threshold")]
    pub preview_threshold: f64,

    /// Distance beyond which releasing the drag commits the choice.
    #[serde(default = "default_commit_threshold")]
    pub commit_threshold: f64,

    /// Distance past the preview threshold over which the preview fades in.
    #[serde(default = "default_preview_fade_distance")]
    pub preview_fade_distance: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            preview_threshold: default_preview_threshold(),
            commit_threshold: default_commit_threshold(),
            preview_fade_distance: default_preview_fade_distance(),
        }
    }
}

/// Timed transitions before the card flow.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimingConfig {
    /// How long the splash screen stays up.
    #[serde(default = "default_loading_delay_ms")]
    pub loading_delay_ms: u64,

    /// How long each intro word stays on screen.
    #[serde(default = "default_intro_word_interval_ms")]
    pub intro_word_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            loading_delay_ms: default_loading_delay_ms(),
            intro_word_interval_ms: default_intro_word_interval_ms(),
        }
    }
}

/// Where "restart" in the finished design game sends the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartTarget {
    /// Straight to the first quiz question.
    #[default]
    QuizQuestions,
    /// To the quiz welcome screen.
    QuizWelcome,
    /// Replay the design game without retaking the quiz.
    Game,
}

/// Screen flow policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FlowConfig {
    /// Destination of the game's restart action.
    #[serde(default)]
    pub restart_target: RestartTarget,
}

/// Chat completion service settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatConfig {
    /// Completion endpoint URL.
    #[serde(default = "default_chat_endpoint")]
    pub endpoint: String,

    /// Model identifier sent with each request.
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// Upper bound on reply length.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// System instruction sent ahead of every user message.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: default_chat_endpoint(),
            model: default_chat_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            request_timeout_ms: default_request_timeout_ms(),
            system_prompt: default_system_prompt(),
            api_key_env: default_api_key_env(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_preview_threshold() -> f64 {
    50.0
}

const fn default_commit_threshold() -> f64 {
    100.0
}

const fn default_preview_fade_distance() -> f64 {
    50.0
}

const fn default_loading_delay_ms() -> u64 {
    2000
}

const fn default_intro_word_interval_ms() -> u64 {
    1000
}

fn default_chat_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_owned()
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_owned()
}

const fn default_max_tokens() -> u32 {
    150
}

const fn default_temperature() -> f64 {
    0.7
}

const fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_system_prompt() -> String {
    "You are a helpful carbon footprint assistant. Provide concise, practical advice about reducing environmental impact.".to_owned()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}
