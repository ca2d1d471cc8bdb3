//! Enumeration types for the GreenTrack app.
//!
//! Choices and pages are closed enumerations rather than display strings, so
//! the content tables and the navigation logic agree on identity at compile
//! time. Display labels live in the content, never in these types.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Decision tree
// ---------------------------------------------------------------------------

/// Identity of a choice offered on a swipe card.
///
/// The decision tree maps a `ChoiceId` to what happens next; the label the
/// user sees is carried separately by [`Choice`](crate::structs::Choice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ChoiceId {
    /// The user is worried about AI.
    Concerned,
    /// The user is hopeful about AI.
    Optimistic,
    /// Learn about the negative environmental impact of AI.
    EnvironmentalImpact,
    /// Take the knowledge check (quiz, then design game).
    TestMe,
    /// Explore applications of AI with the assistant.
    ApplicationsOfAi,
    /// Learn how AI can help sustainability.
    PositiveSustainabilityImpact,
}

/// Identity of an informational page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PageId {
    /// Negative environmental effects of AI: statistics, case studies, mitigation.
    EnvironmentalImpact,
    /// The knowledge check page; opening it launches the quiz.
    KnowledgeCheck,
    /// AI for a sustainable future: timeline, projections, benefits, calculator.
    SustainableFuture,
}

impl PageId {
    /// Whether opening this page hands control to the quiz instead of
    /// rendering static content.
    pub const fn launches_quiz(self) -> bool {
        matches!(self, Self::KnowledgeCheck)
    }
}

/// The side a card was swiped towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SwipeDirection {
    /// Swiped towards negative x; selects the card's left choice.
    Left,
    /// Swiped towards positive x; selects the card's right choice.
    Right,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Sender {
    /// Typed by the user.
    User,
    /// Produced by the assistant (replies, greeting, placeholder, errors).
    Assistant,
}

// ---------------------------------------------------------------------------
// Game feedback
// ---------------------------------------------------------------------------

/// Qualitative feedback bracket for a final sustainability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum FeedbackTier {
    /// 120 and above.
    Outstanding,
    /// 80 through 119.
    Good,
    /// 40 through 79.
    NeedsImprovement,
    /// 39 and below.
    Poor,
}

impl FeedbackTier {
    /// All tiers, best first.
    pub const ALL: [Self; 4] = [
        Self::Outstanding,
        Self::Good,
        Self::NeedsImprovement,
        Self::Poor,
    ];

    /// Presentation severity of this tier.
    pub const fn severity(self) -> Severity {
        match self {
            Self::Outstanding => Severity::Positive,
            Self::Good => Severity::Informative,
            Self::NeedsImprovement => Severity::Warning,
            Self::Poor => Severity::Critical,
        }
    }
}

/// How a feedback message should be emphasized by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Severity {
    /// Green.
    Positive,
    /// Blue.
    Informative,
    /// Orange.
    Warning,
    /// Red.
    Critical,
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// Tag naming the active screen, without the screen's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Screen {
    /// Splash screen shown at startup and after "Back".
    Loading,
    /// Word-by-word intro sequence.
    IntroAnimation,
    /// Swipe cards of the decision tree.
    CardFlow,
    /// A static informational page.
    InfoPage,
    /// The knowledge check quiz.
    Quiz,
    /// The data center design game.
    Game,
    /// The assistant chat.
    Chat,
}
