//! Shared type definitions for the GreenTrack learning app.
//!
//! This crate is the single source of truth for the data exchanged between
//! the content tables, the navigation core, and the presentation layer.
//! Types flow to `TypeScript` via `ts-rs` so a UI shell can render them.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for sessions and messages
//! - [`enums`] -- Choices, pages, swipe directions, feedback tiers, screens
//! - [`structs`] -- Cards, decision tree, quiz/game tables, chat messages, pages

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{ChoiceId, FeedbackTier, PageId, Screen, Sender, Severity, SwipeDirection};
pub use ids::{MessageId, SessionId};
pub use structs::{
    Benefit, BenefitDetail, Card, CaseStudy, ChatMessage, Choice, CitationSection, DecisionTree,
    Figure, GameDecision, Impact, InfoPage, KeyStatistic, ProjectionPoint, QuizQuestion, Strategy,
    TimelineMetrics,
};
