//! Static educational content for GreenTrack.
//!
//! The intro words, decision tree, quiz questions, game decisions, page
//! content, chat texts, and citations are opaque data to the navigation core.
//! They are read from YAML (an asset is embedded at build time and an external
//! file may replace it), validated once, and then shared read-only.
//!
//! # Modules
//!
//! - [`error`] -- Content loading errors
//! - [`repository`] -- The [`ContentRepository`] and its YAML representation

pub mod error;
pub mod repository;
mod validate;

pub use error::ContentError;
pub use repository::{BUILTIN_YAML, ChatContent, ContentRepository, GameContent, QuizContent};
