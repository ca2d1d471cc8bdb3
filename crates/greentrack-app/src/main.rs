//! GreenTrack terminal app.
//!
//! Loads configuration and content, wires the OpenAI-compatible backend into
//! the chat screen, and runs the interactive loop on stdin/stdout. Logs go to
//! stderr so they never interleave with the rendered screens.
//!
//! # Usage
//!
//! ```text
//! greentrack [config.yaml]
//! ```
//!
//! The config path falls back to `GREENTRACK_CONFIG`, then to
//! `greentrack-config.yaml` in the working directory. A missing file means
//! defaults. The API key is read from the variable named by
//! `chat.api_key_env` (default `OPENAI_API_KEY`).

mod error;
mod host;
mod render;
mod shell;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use greentrack_content::ContentRepository;
use greentrack_core::{AppConfig, ViewCoordinator};
use greentrack_llm::{BackendConfig, OpenAiBackend};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;
use crate::host::Host;

const DEFAULT_CONFIG_PATH: &str = "greentrack-config.yaml";

/// Entry point for the GreenTrack terminal app.
///
/// # Errors
///
/// Returns an error if configuration or content cannot be loaded, or if the
/// terminal fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("GREENTRACK_CONFIG").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = AppConfig::load(&config_path)
        .map_err(AppError::from)
        .with_context(|| format!("loading {}", config_path.display()))?;

    init_tracing(&config);
    info!(
        path = %config_path.display(),
        model = config.chat.model,
        restart_target = ?config.flow.restart_target,
        "configuration loaded"
    );

    let content = ContentRepository::load(config.content_path.as_deref())
        .map_err(AppError::from)
        .context("loading content")?;

    let backend = OpenAiBackend::new(BackendConfig::from_chat_config(&config.chat));
    info!(
        endpoint = backend.config().endpoint,
        model = backend.config().model,
        has_api_key = backend.config().api_key.is_some(),
        "chat backend configured"
    );

    let coordinator = ViewCoordinator::new(Arc::new(content), config).map_err(AppError::from)?;
    let mut host = Host::new(coordinator, Arc::new(backend));

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    host.run(stdin, &mut stdout).await?;

    info!(screen = ?host.coordinator().screen(), "GreenTrack stopped");
    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
