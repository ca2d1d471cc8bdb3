//! HTTP chat completion backend for the GreenTrack assistant.
//!
//! Implements [`greentrack_core::CompletionService`] over `reqwest` for
//! OpenAI-compatible endpoints. The API key is read from the environment at
//! startup and never from configuration files or source.
//!
//! # Modules
//!
//! - [`config`] -- Backend settings resolved from the chat configuration
//! - [`openai`] -- The OpenAI-compatible backend

pub mod config;
pub mod openai;

pub use config::BackendConfig;
pub use openai::OpenAiBackend;
