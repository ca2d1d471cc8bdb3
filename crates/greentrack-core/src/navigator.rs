//! Decision tree navigation for the swipe-card flow.
//!
//! The navigator holds the card on screen and the live swipe preview. A
//! committed swipe picks the choice on that side of the card and asks the
//! [`DecisionTree`] what comes next. Choices the tree does not map are
//! ignored: the card stays put.

use greentrack_types::{Card, ChoiceId, DecisionTree, PageId, SwipeDirection};
use tracing::{debug, info};

use crate::gesture::SwipeGestureClassifier;

/// Where a committed choice leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextAction {
    /// Replace the current card.
    ShowCard(Card),
    /// Leave the card flow for an informational page.
    ShowInfoPage(PageId),
    /// Leave the card flow for the assistant chat.
    EnterChat,
}

/// Resolve a choice against the tree.
///
/// The card table is consulted first, then the info-page table, then the
/// chat entry. Anything else yields `None`.
pub fn resolve(choice: ChoiceId, tree: &DecisionTree) -> Option<NextAction> {
    if let Some(card) = tree.cards.get(&choice) {
        return Some(NextAction::ShowCard(card.clone()));
    }
    if let Some(page) = tree.info_pages.get(&choice) {
        return Some(NextAction::ShowInfoPage(*page));
    }
    (choice == tree.chat_entry).then_some(NextAction::EnterChat)
}

/// Label preview shown while a card is being dragged.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoicePreview {
    /// Side the card leans towards.
    pub direction: SwipeDirection,
    /// Label of the choice on that side.
    pub label: String,
    /// Label opacity, in `0.0..=1.0`.
    pub opacity: f64,
}

/// Current card plus in-progress drag feedback.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTreeNavigator {
    current: Card,
    preview: Option<ChoicePreview>,
    classifier: SwipeGestureClassifier,
}

impl DecisionTreeNavigator {
    /// Start at the root of `tree`.
    pub fn new(tree: &DecisionTree, classifier: SwipeGestureClassifier) -> Self {
        Self {
            current: tree.root.clone(),
            preview: None,
            classifier,
        }
    }

    /// The card on screen.
    pub const fn current(&self) -> &Card {
        &self.current
    }

    /// The live drag preview, if any.
    pub const fn preview(&self) -> Option<&ChoicePreview> {
        self.preview.as_ref()
    }

    /// Update the preview for a drag in progress.
    ///
    /// Inside the preview threshold, or towards a side with no choice, the
    /// preview is cleared.
    pub fn drag(&mut self, distance: f64) {
        self.preview = self.classifier.preview(distance).and_then(|hint| {
            self.current.choice(hint.direction).map(|choice| ChoicePreview {
                direction: hint.direction,
                label: choice.label.clone(),
                opacity: hint.opacity,
            })
        });
    }

    /// Finish a drag at `distance`.
    ///
    /// Always clears the preview. Below the commit threshold nothing else
    /// changes and `None` is returned.
    pub fn release(&mut self, distance: f64, tree: &DecisionTree) -> Option<NextAction> {
        self.preview = None;
        match self.classifier.release(distance) {
            Some(direction) => self.select(direction, tree),
            None => {
                debug!(distance, "Swipe released below commit threshold");
                None
            }
        }
    }

    /// Commit the choice on `direction` directly, as a completed swipe would.
    ///
    /// A [`NextAction::ShowCard`] result has already replaced the current
    /// card. Other actions leave the card in place for the caller to act on.
    pub fn select(&mut self, direction: SwipeDirection, tree: &DecisionTree) -> Option<NextAction> {
        self.preview = None;
        let Some(choice) = self.current.choice(direction) else {
            debug!(?direction, "No choice on this side of the card");
            return None;
        };
        let choice_id = choice.id;
        let action = resolve(choice_id, tree);
        match &action {
            Some(NextAction::ShowCard(card)) => {
                info!(choice = ?choice_id, prompt = %card.prompt, "Advancing to next card");
                self.current = card.clone();
            }
            Some(NextAction::ShowInfoPage(page)) => {
                info!(choice = ?choice_id, page = ?page, "Choice opens info page");
            }
            Some(NextAction::EnterChat) => {
                info!(choice = ?choice_id, "Choice opens chat");
            }
            None => {
                debug!(choice = ?choice_id, "Choice is not mapped; staying on card");
            }
        }
        action
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use greentrack_types::Choice;

    use super::*;

    fn choice(id: ChoiceId, label: &str) -> Option<Choice> {
        Some(Choice {
            id,
            label: label.to_owned(),
        })
    }

    fn tree() -> DecisionTree {
        let mut cards = BTreeMap::new();
        cards.insert(
            ChoiceId::Optimistic,
            Card {
                prompt: "What excites you most?".to_owned(),
                left: choice(ChoiceId::ApplicationsOfAi, "Applications of AI"),
                right: choice(ChoiceId::PositiveSustainabilityImpact, "Positive"),
            },
        );
        let mut info_pages = BTreeMap::new();
        info_pages.insert(ChoiceId::PositiveSustainabilityImpact, PageId::SustainableFuture);
        DecisionTree {
            root: Card {
                prompt: "How do you feel about AI?".to_owned(),
                left: choice(ChoiceId::Concerned, "Concerned"),
                right: choice(ChoiceId::Optimistic, "Optimistic"),
            },
            cards,
            info_pages,
            chat_entry: ChoiceId::ApplicationsOfAi,
        }
    }

    #[test]
    fn resolve_checks_cards_then_pages_then_chat() {
        let tree = tree();
        assert!(matches!(
            resolve(ChoiceId::Optimistic, &tree),
            Some(NextAction::ShowCard(_))
        ));
        assert_eq!(
            resolve(ChoiceId::PositiveSustainabilityImpact, &tree),
            Some(NextAction::ShowInfoPage(PageId::SustainableFuture))
        );
        assert_eq!(resolve(ChoiceId::ApplicationsOfAi, &tree), Some(NextAction::EnterChat));
        assert_eq!(resolve(ChoiceId::Concerned, &tree), None);
    }

    #[test]
    fn committed_swipe_right_shows_mapped_card() {
        let tree = tree();
        let mut nav = DecisionTreeNavigator::new(&tree, SwipeGestureClassifier::default());
        let action = nav.release(120.0, &tree);
        assert!(matches!(action, Some(NextAction::ShowCard(_))));
        assert_eq!(nav.current().prompt, "What excites you most?");
    }

    #[test]
    fn short_release_keeps_card_and_clears_preview() {
        let tree = tree();
        let mut nav = DecisionTreeNavigator::new(&tree, SwipeGestureClassifier::default());
        nav.drag(90.0);
        assert_eq!(nav.preview().map(|p| p.label.as_str()), Some("Optimistic"));

        assert_eq!(nav.release(90.0, &tree), None);
        assert!(nav.preview().is_none());
        assert_eq!(nav.current().prompt, "How do you feel about AI?");
    }

    #[test]
    fn unmapped_choice_is_silent_noop() {
        let tree = tree();
        let mut nav = DecisionTreeNavigator::new(&tree, SwipeGestureClassifier::default());
        assert_eq!(nav.release(-150.0, &tree), None);
        assert_eq!(nav.current().prompt, "How do you feel about AI?");
    }

    #[test]
    fn drag_towards_empty_side_has_no_preview() {
        let mut tree = tree();
        tree.root.left = None;
        let mut nav = DecisionTreeNavigator::new(&tree, SwipeGestureClassifier::default());
        nav.drag(-90.0);
        assert!(nav.preview().is_none());
        nav.drag(10.0);
        assert!(nav.preview().is_none());
    }

    #[test]
    fn terminal_choice_leaves_card_in_place() {
        let tree = tree();
        let mut nav = DecisionTreeNavigator::new(&tree, SwipeGestureClassifier::default());
        let _ = nav.select(SwipeDirection::Right, &tree);
        let action = nav.select(SwipeDirection::Left, &tree);
        assert_eq!(action, Some(NextAction::EnterChat));
        assert_eq!(nav.current().prompt, "What excites you most?");
    }
}
