//! Navigation core of the GreenTrack learning app.
//!
//! Everything here is synchronous and free of I/O except the
//! [`chat::CompletionService`] seam, which the host fulfills. The host feeds
//! user input and elapsed time into the [`coordinator::ViewCoordinator`] and
//! carries out the effects it returns.
//!
//! # Modules
//!
//! - [`config`] -- Typed configuration loaded from YAML with env overrides
//! - [`clock`] -- Virtual scene clock with a single fire-once timer
//! - [`gesture`] -- Swipe classification with preview and commit thresholds
//! - [`navigator`] -- Decision tree resolution and the card on screen
//! - [`quiz`] -- Knowledge check scoring
//! - [`game`] -- Data center design game scoring and feedback tiers
//! - [`info`] -- Timeline slider, benefits, and footprint calculator state
//! - [`chat`] -- Chat transcript and the completion service trait
//! - [`coordinator`] -- Pure screen transitions and the coordinator that runs them

pub mod chat;
pub mod clock;
pub mod config;
pub mod coordinator;
pub mod game;
pub mod gesture;
pub mod info;
pub mod navigator;
pub mod quiz;

pub use chat::{
    ChatSession, CompletionError, CompletionRequest, CompletionService, FaultCategory,
    PendingCompletion, StubCompletionService,
};
pub use clock::{ClockError, SceneClock, TimerKind};
pub use config::{AppConfig, ChatConfig, ConfigError, RestartTarget};
pub use coordinator::{Effect, Event, NavigationState, Transition, ViewCoordinator, transition};
pub use game::{FinalFeedback, GameEngine, GameStep, feedback_tier};
pub use gesture::{SwipeGestureClassifier, SwipePreview, classify};
pub use info::{InfoPageState, YearReading, calculate_footprint};
pub use navigator::{ChoicePreview, DecisionTreeNavigator, NextAction, resolve};
pub use quiz::{AnswerFeedback, QuizEngine, QuizPhase, QuizProgress};
