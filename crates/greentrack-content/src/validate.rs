//! Structural checks run once after parsing.
//!
//! Everything the navigation core indexes into is checked here, so the
//! engines can treat the tables as well-formed.

use std::collections::BTreeSet;

use greentrack_types::{Card, FeedbackTier, InfoPage};

use crate::error::ContentError;
use crate::repository::ContentRepository;

/// Validate every table of a freshly parsed repository.
pub(crate) fn check(repo: &ContentRepository) -> Result<(), ContentError> {
    if repo.intro_words().is_empty() {
        return Err(ContentError::invalid("intro_words must not be empty"));
    }
    check_tree(repo)?;
    check_quiz(repo)?;
    check_game(repo)?;
    for page in repo.pages().values() {
        check_page(page)?;
    }
    Ok(())
}

fn check_card(card: &Card, location: &str) -> Result<(), ContentError> {
    if card.is_actionable() {
        Ok(())
    } else {
        Err(ContentError::invalid(format!(
            "{location} card \"{}\" offers no choice",
            card.prompt
        )))
    }
}

fn check_tree(repo: &ContentRepository) -> Result<(), ContentError> {
    let tree = repo.decision_tree();
    check_card(&tree.root, "root")?;
    for (choice, card) in &tree.cards {
        check_card(card, &format!("{choice:?}"))?;
        if tree.info_pages.contains_key(choice) {
            return Err(ContentError::invalid(format!(
                "choice {choice:?} maps to both a card and an info page"
            )));
        }
    }

    if tree.cards.contains_key(&tree.chat_entry) || tree.info_pages.contains_key(&tree.chat_entry) {
        return Err(ContentError::invalid(format!(
            "chat entry {:?} is also mapped to a card or page",
            tree.chat_entry
        )));
    }

    for (choice, page) in &tree.info_pages {
        if !page.launches_quiz() && repo.page(*page).is_none() {
            return Err(ContentError::invalid(format!(
                "choice {choice:?} opens page {page:?}, which is not defined"
            )));
        }
    }
    Ok(())
}

fn check_quiz(repo: &ContentRepository) -> Result<(), ContentError> {
    let questions = &repo.quiz().questions;
    if questions.is_empty() {
        return Err(ContentError::invalid("quiz has no questions"));
    }
    for (index, question) in questions.iter().enumerate() {
        if question.correct_answer >= question.options.len() {
            return Err(ContentError::invalid(format!(
                "quiz question {index}: correct answer {} is out of range for {} options",
                question.correct_answer,
                question.options.len()
            )));
        }
    }
    Ok(())
}

fn check_game(repo: &ContentRepository) -> Result<(), ContentError> {
    let game = repo.game();
    if game.decisions.is_empty() {
        return Err(ContentError::invalid("game has no decisions"));
    }
    for (index, decision) in game.decisions.iter().enumerate() {
        if decision.options.is_empty() {
            return Err(ContentError::invalid(format!(
                "game decision {index} has no options"
            )));
        }
        if decision.options.len() != decision.impacts.len() {
            return Err(ContentError::invalid(format!(
                "game decision {index}: {} options but {} impacts",
                decision.options.len(),
                decision.impacts.len()
            )));
        }
    }
    if let Some(tier) = FeedbackTier::ALL
        .into_iter()
        .find(|tier| !game.feedback.contains_key(tier))
    {
        return Err(ContentError::invalid(format!(
            "game feedback has no message for {tier:?}"
        )));
    }
    Ok(())
}

fn check_page(page: &InfoPage) -> Result<(), ContentError> {
    if !page.timeline.windows(2).all(|pair| match pair {
        [earlier, later] => earlier.year < later.year,
        _ => true,
    }) {
        return Err(ContentError::invalid(format!(
            "page {:?}: timeline years must be strictly ascending",
            page.id
        )));
    }

    let mut seen = BTreeSet::new();
    for benefit in &page.benefits {
        if !seen.insert(benefit.id) {
            return Err(ContentError::invalid(format!(
                "page {:?}: benefit id {} is used twice",
                page.id, benefit.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::repository::BUILTIN_YAML;
    use crate::{ContentError, ContentRepository};

    fn reason(yaml: &str) -> String {
        match ContentRepository::parse(yaml) {
            Err(ContentError::Invalid { reason }) => reason,
            other => format!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn out_of_range_correct_answer_is_rejected() {
        let yaml = BUILTIN_YAML.replacen("correct_answer: 2", "correct_answer: 9", 1);
        assert!(reason(&yaml).contains("out of range"));
    }

    #[test]
    fn impacts_must_match_options() {
        let yaml = BUILTIN_YAML.replacen(
            "        - { sustainability: -20, note: \"Requires significant computational power and energy.\" }\n",
            "",
            1,
        );
        assert!(reason(&yaml).contains("impacts"));
    }

    #[test]
    fn missing_tier_message_is_rejected() {
        let start = BUILTIN_YAML.find("    poor: ");
        let end = BUILTIN_YAML.find("\npages:");
        let yaml = match (start, end) {
            (Some(start), Some(end)) => {
                let mut yaml = BUILTIN_YAML.to_owned();
                yaml.replace_range(start..end, "");
                yaml
            }
            _ => String::new(),
        };
        assert!(reason(&yaml).contains("Poor"));
    }

    #[test]
    fn overlapping_tree_tables_are_rejected() {
        let yaml = BUILTIN_YAML.replacen(
            "  chat_entry: applications_of_ai",
            "  chat_entry: test_me",
            1,
        );
        assert!(reason(&yaml).contains("chat entry"));
    }

    #[test]
    fn choice_with_card_and_page_is_rejected() {
        let yaml = BUILTIN_YAML.replacen(
            "    positive_sustainability_impact: sustainable_future\n",
            "    positive_sustainability_impact: sustainable_future\n    concerned: environmental_impact\n",
            1,
        );
        assert!(reason(&yaml).contains("both a card and an info page"));
    }

    #[test]
    fn empty_intro_is_rejected() {
        let start = BUILTIN_YAML.find("intro_words:");
        let end = BUILTIN_YAML.find("\ndecision_tree:");
        let yaml = match (start, end) {
            (Some(start), Some(end)) => {
                let mut yaml = BUILTIN_YAML.to_owned();
                yaml.replace_range(start..end, "intro_words: []\n");
                yaml
            }
            _ => String::new(),
        };
        assert!(reason(&yaml).contains("intro_words"));
    }
}
