//! Knowledge check quiz.
//!
//! Questions are answered in order. Each answer is locked in and scored the
//! moment it is selected, the explanation is revealed, and only then can the
//! user move on. The score is a plain count of correct answers.

use greentrack_types::QuizQuestion;
use tracing::{debug, info};

/// Which screen of the quiz is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Title and description with a "start quiz" action.
    Welcome,
    /// Questions are being answered.
    Answering,
    /// The last question has been answered and advanced past.
    Complete,
}

/// Result of selecting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    /// Whether the selected option was the correct one.
    pub correct: bool,
    /// Index of the correct option.
    pub correct_answer: usize,
    /// Explanation now on screen.
    pub explanation: String,
}

/// Result of advancing past an answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizProgress {
    /// Moved on to the question at this index.
    Next {
        /// Zero-based index of the new current question.
        index: usize,
    },
    /// No questions remain.
    Finished {
        /// Number of correct answers.
        score: usize,
        /// Number of questions asked.
        total: usize,
    },
}

/// Quiz state for one run through the questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizEngine {
    questions: Vec<QuizQuestion>,
    phase: QuizPhase,
    index: usize,
    score: usize,
    selected: Option<usize>,
    show_explanation: bool,
}

impl QuizEngine {
    /// A fresh quiz on its welcome screen.
    pub const fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            phase: QuizPhase::Welcome,
            index: 0,
            score: 0,
            selected: None,
            show_explanation: false,
        }
    }

    /// A fresh quiz that skips the welcome screen.
    pub fn started(questions: Vec<QuizQuestion>) -> Self {
        let mut quiz = Self::new(questions);
        let _ = quiz.start();
        quiz
    }

    /// Leave the welcome screen. Returns `false` if already started.
    pub fn start(&mut self) -> bool {
        if self.phase != QuizPhase::Welcome {
            return false;
        }
        self.phase = QuizPhase::Answering;
        info!(questions = self.questions.len(), "Quiz started");
        true
    }

    /// Current phase.
    pub const fn phase(&self) -> QuizPhase {
        self.phase
    }

    /// The question on screen while answering.
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        if self.phase == QuizPhase::Answering {
            self.questions.get(self.index)
        } else {
            None
        }
    }

    /// Zero-based index of the current question.
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Number of questions.
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Correct answers so far.
    pub const fn score(&self) -> usize {
        self.score
    }

    /// The option selected for the current question, if any.
    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Whether the explanation of the current question is showing.
    pub const fn explanation_shown(&self) -> bool {
        self.show_explanation
    }

    /// Select an answer for the current question.
    ///
    /// Rejected (returns `None`, nothing changes) outside the answering
    /// phase, when the explanation is already showing, or when `option` is
    /// out of range.
    pub fn select_answer(&mut self, option: usize) -> Option<AnswerFeedback> {
        if self.show_explanation {
            debug!(option, "Answer rejected: question already answered");
            return None;
        }
        let question = self.current_question()?;
        if option >= question.options.len() {
            debug!(option, options = question.options.len(), "Answer rejected: out of range");
            return None;
        }

        let correct = option == question.correct_answer;
        let feedback = AnswerFeedback {
            correct,
            correct_answer: question.correct_answer,
            explanation: question.explanation.clone(),
        };
        if correct {
            self.score = self.score.saturating_add(1);
        }
        self.selected = Some(option);
        self.show_explanation = true;
        debug!(index = self.index, option, correct, score = self.score, "Answer recorded");
        Some(feedback)
    }

    /// Move past an answered question.
    ///
    /// Rejected (returns `None`) unless the explanation is showing.
    pub fn advance(&mut self) -> Option<QuizProgress> {
        if !self.show_explanation || self.phase != QuizPhase::Answering {
            debug!("Advance rejected: current question not answered");
            return None;
        }
        self.selected = None;
        self.show_explanation = false;

        match self.index.checked_add(1).filter(|next| *next < self.questions.len()) {
            Some(next) => {
                self.index = next;
                Some(QuizProgress::Next { index: next })
            }
            None => {
                self.phase = QuizPhase::Complete;
                info!(score = self.score, total = self.total(), "Quiz complete");
                Some(QuizProgress::Finished {
                    score: self.score,
                    total: self.total(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct_answer: usize) -> QuizQuestion {
        QuizQuestion {
            prompt: "?".to_owned(),
            options: vec!["a".to_owned(), "b".to_owned(), "c".to_owned()],
            correct_answer,
            explanation: "because".to_owned(),
        }
    }

    #[test]
    fn score_counts_matches_for_every_answer_sequence() {
        let key = [0_usize, 2, 1];
        for a in 0..3 {
            for b in 0..3 {
                for c in 0..3 {
                    let answers = [a, b, c];
                    let mut quiz = QuizEngine::started(key.iter().map(|k| question(*k)).collect());
                    let mut finished = None;
                    for answer in answers {
                        assert!(quiz.select_answer(answer).is_some());
                        finished = quiz.advance();
                    }

                    let matches = answers.iter().zip(key).filter(|(x, k)| **x == *k).count();
                    assert_eq!(
                        finished,
                        Some(QuizProgress::Finished { score: matches, total: 3 }),
                        "answers {answers:?}"
                    );
                    assert!(quiz.score() <= quiz.total());
                }
            }
        }
    }

    #[test]
    fn welcome_blocks_answers_until_started() {
        let mut quiz = QuizEngine::new(vec![question(0)]);
        assert_eq!(quiz.phase(), QuizPhase::Welcome);
        assert!(quiz.select_answer(0).is_none());
        assert!(quiz.start());
        assert!(!quiz.start());
        assert!(quiz.select_answer(0).is_some());
    }

    #[test]
    fn second_answer_is_rejected_while_explanation_shows() {
        let mut quiz = QuizEngine::started(vec![question(1), question(1)]);
        let first = quiz.select_answer(1);
        assert_eq!(first.map(|f| f.correct), Some(true));
        assert!(quiz.select_answer(0).is_none());
        assert_eq!(quiz.score(), 1);
        assert_eq!(quiz.selected(), Some(1));
    }

    #[test]
    fn out_of_range_answer_is_rejected() {
        let mut quiz = QuizEngine::started(vec![question(0)]);
        assert!(quiz.select_answer(3).is_none());
        assert!(!quiz.explanation_shown());
    }

    #[test]
    fn advance_requires_answer() {
        let mut quiz = QuizEngine::started(vec![question(0), question(0)]);
        assert!(quiz.advance().is_none());
        let _ = quiz.select_answer(2);
        assert_eq!(quiz.advance(), Some(QuizProgress::Next { index: 1 }));
        assert_eq!(quiz.selected(), None);
        assert!(!quiz.explanation_shown());
    }

    #[test]
    fn finishing_reports_score() {
        let mut quiz = QuizEngine::started(vec![question(0), question(2)]);
        let _ = quiz.select_answer(0);
        let _ = quiz.advance();
        let _ = quiz.select_answer(1);
        assert_eq!(
            quiz.advance(),
            Some(QuizProgress::Finished { score: 1, total: 2 })
        );
        assert_eq!(quiz.phase(), QuizPhase::Complete);
        assert!(quiz.current_question().is_none());
        assert!(quiz.advance().is_none());
    }
}
