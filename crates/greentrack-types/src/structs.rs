//! Core data structs: cards, the decision tree, quiz and game tables, chat
//! messages, and informational page content.
//!
//! Everything here is plain data. Behavior (navigation, scoring, transcript
//! management) lives in `greentrack-core`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ChoiceId, PageId, Sender, SwipeDirection};
use crate::ids::MessageId;

// ---------------------------------------------------------------------------
// Cards and the decision tree
// ---------------------------------------------------------------------------

/// A labeled option on one side of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Choice {
    /// What the choice means to the decision tree.
    pub id: ChoiceId,
    /// Text shown to the user (and as the swipe preview).
    pub label: String,
}

/// A single swipeable decision prompt with up to two labeled choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Card {
    /// The question shown on the card.
    pub prompt: String,
    /// Choice selected by swiping left.
    #[serde(default)]
    pub left: Option<Choice>,
    /// Choice selected by swiping right.
    #[serde(default)]
    pub right: Option<Choice>,
}

impl Card {
    /// A card is actionable when at least one side carries a choice.
    pub const fn is_actionable(&self) -> bool {
        self.left.is_some() || self.right.is_some()
    }

    /// The choice on the given side, if any.
    pub const fn choice(&self, direction: SwipeDirection) -> Option<&Choice> {
        match direction {
            SwipeDirection::Left => self.left.as_ref(),
            SwipeDirection::Right => self.right.as_ref(),
        }
    }
}

/// Static mapping from a choice to the next card or a terminal action.
///
/// Keys are unique per table, and the three tables are disjoint (enforced by
/// the content loader). A choice present in none of them terminates nowhere:
/// the current card simply stays on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DecisionTree {
    /// The card shown when the card flow starts.
    pub root: Card,
    /// Choice → next card.
    #[serde(default)]
    pub cards: BTreeMap<ChoiceId, Card>,
    /// Choice → informational page.
    #[serde(default)]
    pub info_pages: BTreeMap<ChoiceId, PageId>,
    /// The choice that hands the user over to the assistant chat.
    pub chat_entry: ChoiceId,
}

// ---------------------------------------------------------------------------
// Quiz
// ---------------------------------------------------------------------------

/// One multiple-choice question of the knowledge check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct QuizQuestion {
    /// Question text.
    pub prompt: String,
    /// Answer options in display order.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct_answer: usize,
    /// Explanation revealed after the user answers.
    pub explanation: String,
}

// ---------------------------------------------------------------------------
// Design game
// ---------------------------------------------------------------------------

/// Effect of picking one option of a [`GameDecision`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Impact {
    /// Signed change to the sustainability score.
    pub sustainability: i32,
    /// Short note shown under the option.
    pub note: String,
}

/// One step of the data center design game.
///
/// `options` and `impacts` are parallel lists of equal length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameDecision {
    /// The decision being made.
    pub prompt: String,
    /// Options in display order.
    pub options: Vec<String>,
    /// Impact of each option, index-aligned with `options`.
    pub impacts: Vec<Impact>,
    /// Background shown beneath the options.
    pub educational_note: String,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// A message in a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ChatMessage {
    /// Identity of this message within its transcript.
    pub id: MessageId,
    /// Message body.
    pub text: String,
    /// Who authored the message.
    pub sender: Sender,
    /// Optional quick-reply suggestions attached to the message.
    #[serde(default)]
    pub options: Option<Vec<String>>,
    /// True for the "thinking" placeholder shown while a reply is pending.
    #[serde(default)]
    pub transient: bool,
    /// When the message was appended.
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    /// A message typed by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self::build(text.into(), Sender::User, false)
    }

    /// A message authored by the assistant.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::build(text.into(), Sender::Assistant, false)
    }

    /// The transient "thinking" placeholder.
    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::build(text.into(), Sender::Assistant, true)
    }

    /// Whether the user wrote this message.
    pub const fn is_user(&self) -> bool {
        matches!(self.sender, Sender::User)
    }

    fn build(text: String, sender: Sender, transient: bool) -> Self {
        Self {
            id: MessageId::new(),
            text,
            sender,
            options: None,
            transient,
            sent_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Informational pages
// ---------------------------------------------------------------------------

/// A headline number with context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct KeyStatistic {
    /// What is being measured.
    pub title: String,
    /// The headline value, preformatted.
    pub value: String,
    /// A relatable comparison.
    pub description: String,
}

/// A real-world example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CaseStudy {
    /// Case study heading.
    pub title: String,
    /// Case study body.
    pub description: String,
}

/// A captioned image asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Figure {
    /// Figure heading.
    pub title: String,
    /// Name of the bundled image asset.
    pub asset: String,
    /// Caption text.
    pub caption: String,
}

/// A mitigation strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Strategy {
    /// Strategy name.
    pub title: String,
    /// What the strategy does.
    pub description: String,
    /// A concrete example.
    pub example: String,
    /// Symbol name for the icon.
    #[serde(default)]
    pub symbol: String,
}

/// An expandable benefit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Benefit {
    /// Stable identifier used to expand or collapse the entry.
    pub id: u32,
    /// Benefit heading.
    pub title: String,
    /// One-line summary.
    pub description: String,
    /// Details revealed when expanded.
    #[serde(default)]
    pub details: Vec<BenefitDetail>,
}

/// A detail row inside a [`Benefit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BenefitDetail {
    /// Detail heading.
    pub title: String,
    /// Detail body.
    pub description: String,
}

/// Sustainability metrics for one year, in percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TimelineMetrics {
    /// Calendar year.
    pub year: i32,
    /// Efficiency level.
    #[ts(as = "String")]
    pub efficiency: Decimal,
    /// Emissions level relative to the baseline.
    #[ts(as = "String")]
    pub emissions: Decimal,
    /// Waste level relative to the baseline.
    #[ts(as = "String")]
    pub waste: Decimal,
}

/// One point of a projected series (e.g. carbon intensity with AI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ProjectionPoint {
    /// Calendar year.
    pub year: i32,
    /// Projected value.
    #[ts(as = "String")]
    pub value: Decimal,
}

/// Content of one informational page.
///
/// Sections a page does not use are left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InfoPage {
    /// Which page this is.
    pub id: PageId,
    /// Page heading.
    pub title: String,
    /// Introductory paragraph.
    #[serde(default)]
    pub intro: String,
    /// Headline statistics.
    #[serde(default)]
    pub statistics: Vec<KeyStatistic>,
    /// Real-world examples.
    #[serde(default)]
    pub case_studies: Vec<CaseStudy>,
    /// Captioned figures.
    #[serde(default)]
    pub figures: Vec<Figure>,
    /// Mitigation strategies.
    #[serde(default)]
    pub strategies: Vec<Strategy>,
    /// Expandable benefits.
    #[serde(default)]
    pub benefits: Vec<Benefit>,
    /// Year-by-year metrics explored with the year slider.
    #[serde(default)]
    pub timeline: Vec<TimelineMetrics>,
    /// Projected series shown as a chart.
    #[serde(default)]
    pub projection: Vec<ProjectionPoint>,
    /// Caption under the projection chart.
    #[serde(default)]
    pub projection_caption: String,
    /// Whether the carbon-footprint calculator is offered.
    #[serde(default)]
    pub footprint_calculator: bool,
}

/// A titled list of source URLs shown in the credits overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CitationSection {
    /// Section heading.
    pub title: String,
    /// Source URLs.
    pub sources: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(id: ChoiceId, label: &str) -> Choice {
        Choice {
            id,
            label: label.to_owned(),
        }
    }

    #[test]
    fn card_without_choices_is_not_actionable() {
        let card = Card {
            prompt: String::from("Nothing to pick"),
            left: None,
            right: None,
        };
        assert!(!card.is_actionable());
    }

    #[test]
    fn card_choice_by_direction() {
        let card = Card {
            prompt: String::from("How do you feel about AI?"),
            left: Some(choice(ChoiceId::Concerned, "Concerned")),
            right: Some(choice(ChoiceId::Optimistic, "Optimistic")),
        };
        assert!(card.is_actionable());
        assert_eq!(
            card.choice(SwipeDirection::Left).map(|c| c.id),
            Some(ChoiceId::Concerned)
        );
        assert_eq!(
            card.choice(SwipeDirection::Right).map(|c| c.label.as_str()),
            Some("Optimistic")
        );
    }

    #[test]
    fn placeholder_is_transient_assistant_message() {
        let msg = ChatMessage::placeholder("Thinking...");
        assert!(msg.transient);
        assert!(!msg.is_user());

        let user = ChatMessage::user("hi");
        assert!(user.is_user());
        assert!(!user.transient);
    }

    #[test]
    fn timeline_metrics_accept_string_decimals() {
        let json = r#"{"year": 2022, "efficiency": "55", "emissions": "65", "waste": "55"}"#;
        let parsed: Result<TimelineMetrics, _> = serde_json::from_str(json);
        assert!(parsed.is_ok());
        let metrics = parsed.ok();
        assert_eq!(metrics.map(|m| m.efficiency), Some(Decimal::new(55, 0)));
    }
}
