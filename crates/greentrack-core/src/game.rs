//! Data center design game.
//!
//! The user makes a fixed sequence of design decisions. Every option carries
//! a signed sustainability impact which is added to a running score. After
//! the last decision the score is mapped onto a feedback tier.

use greentrack_content::GameContent;
use greentrack_types::{FeedbackTier, GameDecision, Severity};
use tracing::{debug, info};

/// Lowest score in the outstanding band.
pub const OUTSTANDING_MIN: i64 = 120;
/// Lowest score in the good band.
pub const GOOD_MIN: i64 = 80;
/// Lowest score in the needs-improvement band.
pub const NEEDS_IMPROVEMENT_MIN: i64 = 40;

/// Map a final score onto its feedback tier.
///
/// Bands are checked from the top, so anything at or above
/// [`OUTSTANDING_MIN`] is outstanding, including scores past the nominal
/// maximum.
pub const fn feedback_tier(score: i64) -> FeedbackTier {
    if score >= OUTSTANDING_MIN {
        FeedbackTier::Outstanding
    } else if score >= GOOD_MIN {
        FeedbackTier::Good
    } else if score >= NEEDS_IMPROVEMENT_MIN {
        FeedbackTier::NeedsImprovement
    } else {
        FeedbackTier::Poor
    }
}

/// Outcome of choosing an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStep {
    /// Moved on to the decision at this index.
    Next {
        /// Zero-based index of the new current decision.
        index: usize,
        /// Impact of the option just chosen.
        delta: i32,
    },
    /// That was the last decision.
    Finished {
        /// Final sustainability score.
        score: i64,
        /// Tier the score falls into.
        tier: FeedbackTier,
    },
}

/// The closing screen of the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalFeedback {
    /// Final sustainability score.
    pub score: i64,
    /// Tier the score falls into.
    pub tier: FeedbackTier,
    /// How strongly to emphasize the message.
    pub severity: Severity,
    /// Message for the tier.
    pub message: String,
}

/// Game state for one playthrough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEngine {
    content: GameContent,
    index: usize,
    score: i64,
    finished: bool,
}

impl GameEngine {
    /// A new game at the first decision with a zero score.
    pub const fn new(content: GameContent) -> Self {
        Self {
            content,
            index: 0,
            score: 0,
            finished: false,
        }
    }

    /// The decision on screen, or `None` once the game is over.
    pub fn current_decision(&self) -> Option<&GameDecision> {
        if self.finished {
            None
        } else {
            self.content.decisions.get(self.index)
        }
    }

    /// Zero-based index of the current decision.
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Number of decisions.
    pub fn total(&self) -> usize {
        self.content.decisions.len()
    }

    /// Running sustainability score.
    pub const fn score(&self) -> i64 {
        self.score
    }

    /// Whether the final score is showing.
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Choose an option of the current decision.
    ///
    /// Returns `None` without changing anything once the game is finished or
    /// when `option` is out of range.
    pub fn choose_option(&mut self, option: usize) -> Option<GameStep> {
        let decision = self.current_decision()?;
        let Some(impact) = decision.impacts.get(option) else {
            debug!(option, options = decision.options.len(), "Option rejected: out of range");
            return None;
        };
        let delta = impact.sustainability;
        self.score = self.score.saturating_add(i64::from(delta));
        debug!(index = self.index, option, delta, score = self.score, "Design decision made");

        match self.index.checked_add(1).filter(|next| *next < self.total()) {
            Some(next) => {
                self.index = next;
                Some(GameStep::Next { index: next, delta })
            }
            None => {
                self.finished = true;
                let tier = feedback_tier(self.score);
                info!(score = self.score, tier = ?tier, "Design game complete");
                Some(GameStep::Finished {
                    score: self.score,
                    tier,
                })
            }
        }
    }

    /// The closing feedback, once finished.
    pub fn final_feedback(&self) -> Option<FinalFeedback> {
        if !self.finished {
            return None;
        }
        let tier = feedback_tier(self.score);
        Some(FinalFeedback {
            score: self.score,
            tier,
            severity: tier.severity(),
            message: self.content.message(tier).to_owned(),
        })
    }

    /// Reset to the first decision with a zero score.
    pub fn restart(&mut self) {
        self.index = 0;
        self.score = 0;
        self.finished = false;
        info!("Design game restarted");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use greentrack_types::Impact;

    use super::*;

    fn decision(impacts: &[i32]) -> GameDecision {
        GameDecision {
            prompt: "pick".to_owned(),
            options: impacts.iter().map(|i| format!("option {i}")).collect(),
            impacts: impacts
                .iter()
                .map(|i| Impact {
                    sustainability: *i,
                    note: String::new(),
                })
                .collect(),
            educational_note: String::new(),
        }
    }

    fn content(decisions: Vec<GameDecision>) -> GameContent {
        let feedback: BTreeMap<FeedbackTier, String> = FeedbackTier::ALL
            .into_iter()
            .map(|tier| (tier, format!("{tier:?}")))
            .collect();
        GameContent {
            title: String::new(),
            decisions,
            feedback,
        }
    }

    #[test]
    fn tier_bands_are_inclusive_top_down() {
        assert_eq!(feedback_tier(155), FeedbackTier::Outstanding);
        assert_eq!(feedback_tier(150), FeedbackTier::Outstanding);
        assert_eq!(feedback_tier(120), FeedbackTier::Outstanding);
        assert_eq!(feedback_tier(119), FeedbackTier::Good);
        assert_eq!(feedback_tier(80), FeedbackTier::Good);
        assert_eq!(feedback_tier(79), FeedbackTier::NeedsImprovement);
        assert_eq!(feedback_tier(40), FeedbackTier::NeedsImprovement);
        assert_eq!(feedback_tier(39), FeedbackTier::Poor);
        assert_eq!(feedback_tier(-120), FeedbackTier::Poor);
    }

    #[test]
    fn score_accumulates_signed_impacts() {
        let mut game = GameEngine::new(content(vec![decision(&[30, -20]), decision(&[-10, 5])]));
        assert_eq!(game.choose_option(1), Some(GameStep::Next { index: 1, delta: -20 }));
        assert_eq!(
            game.choose_option(0),
            Some(GameStep::Finished {
                score: -30,
                tier: FeedbackTier::Poor
            })
        );
        assert!(game.is_finished());
        assert!(game.choose_option(0).is_none());

        let feedback = game.final_feedback();
        assert_eq!(feedback.as_ref().map(|f| f.severity), Some(Severity::Critical));
        assert_eq!(feedback.map(|f| f.message), Some("Poor".to_owned()));
    }

    #[test]
    fn score_is_sum_of_chosen_deltas_for_every_path() {
        let table: [[i32; 3]; 3] = [[30, -20, 5], [25, 10, -15], [20, 0, -30]];
        for a in 0..3 {
            for b in 0..3 {
                for c in 0..3 {
                    let path = [a, b, c];
                    let mut game =
                        GameEngine::new(content(table.iter().map(|row| decision(row)).collect()));
                    let mut last = None;
                    for option in path {
                        last = game.choose_option(option);
                    }

                    let expected: i64 = path
                        .iter()
                        .zip(&table)
                        .filter_map(|(option, row)| row.get(*option))
                        .map(|delta| i64::from(*delta))
                        .sum();
                    assert_eq!(game.score(), expected, "path {path:?}");
                    assert_eq!(
                        last,
                        Some(GameStep::Finished {
                            score: expected,
                            tier: feedback_tier(expected)
                        })
                    );
                }
            }
        }
    }

    #[test]
    fn out_of_range_option_is_rejected() {
        let mut game = GameEngine::new(content(vec![decision(&[10, 20])]));
        assert!(game.choose_option(2).is_none());
        assert_eq!(game.score(), 0);
        assert_eq!(game.index(), 0);
    }

    #[test]
    fn restart_resets_progress() {
        let mut game = GameEngine::new(content(vec![decision(&[30])]));
        let _ = game.choose_option(0);
        game.restart();
        assert_eq!(game.score(), 0);
        assert_eq!(game.index(), 0);
        assert!(!game.is_finished());
        assert!(game.final_feedback().is_none());
        assert!(game.current_decision().is_some());
    }
}
