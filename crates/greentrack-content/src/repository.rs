//! The content repository and its YAML representation.

use std::collections::BTreeMap;
use std::path::Path;

use greentrack_types::{
    CitationSection, DecisionTree, FeedbackTier, GameDecision, InfoPage, PageId, QuizQuestion,
};
use serde::Deserialize;
use tracing::info;

use crate::error::ContentError;
use crate::validate;

/// The content asset compiled into the binary.
pub const BUILTIN_YAML: &str = include_str!("../assets/content.yaml");

/// Quiz title, welcome text, and questions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuizContent {
    /// Heading shown above the quiz.
    #[serde(default)]
    pub title: String,
    /// Paragraphs of the welcome screen, shown before the first question.
    #[serde(default)]
    pub welcome: Vec<String>,
    /// Questions in the order they are asked.
    pub questions: Vec<QuizQuestion>,
}

/// Design game decisions and the closing message for each feedback tier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameContent {
    /// Heading shown above the game.
    #[serde(default)]
    pub title: String,
    /// Decisions in the order they are presented.
    pub decisions: Vec<GameDecision>,
    /// Final feedback message per tier.
    pub feedback: BTreeMap<FeedbackTier, String>,
}

impl GameContent {
    /// The closing message for a tier. Validation guarantees every tier has one.
    pub fn message(&self, tier: FeedbackTier) -> &str {
        self.feedback.get(&tier).map_or("", String::as_str)
    }
}

/// Fixed assistant texts of the chat screen.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatContent {
    /// First assistant message of every session.
    pub greeting: String,
    /// Text of the transient message shown while a reply is pending.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

fn default_placeholder() -> String {
    "Thinking...".to_owned()
}

/// On-disk shape of the content file. Pages are a list there and keyed by id
/// once loaded.
#[derive(Deserialize)]
struct ContentFile {
    intro_words: Vec<String>,
    decision_tree: DecisionTree,
    quiz: QuizContent,
    game: GameContent,
    #[serde(default)]
    pages: Vec<InfoPage>,
    chat: ChatContent,
    #[serde(default)]
    citations: Vec<CitationSection>,
}

/// Immutable, validated content tables.
///
/// Built once at startup and shared read-only by every component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRepository {
    intro_words: Vec<String>,
    decision_tree: DecisionTree,
    quiz: QuizContent,
    game: GameContent,
    pages: BTreeMap<PageId, InfoPage>,
    chat: ChatContent,
    citations: Vec<CitationSection>,
}

impl ContentRepository {
    /// Load content from a YAML file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Io`] if the file cannot be read,
    /// [`ContentError::Yaml`] if the content is not valid YAML, or
    /// [`ContentError::Invalid`] if the tables are inconsistent.
    pub fn from_file(path: &Path) -> Result<Self, ContentError> {
        let contents = std::fs::read_to_string(path)?;
        let repo = Self::parse(&contents)?;
        info!(path = %path.display(), "Loaded content from file");
        Ok(repo)
    }

    /// Parse and validate content from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Yaml`] if the string is not valid YAML, or
    /// [`ContentError::Invalid`] if the tables are inconsistent.
    pub fn parse(yaml: &str) -> Result<Self, ContentError> {
        let file: ContentFile = serde_yml::from_str(yaml)?;

        let mut pages = BTreeMap::new();
        for page in file.pages {
            let id = page.id;
            if pages.insert(id, page).is_some() {
                return Err(ContentError::invalid(format!("page {id:?} is defined twice")));
            }
        }

        let repo = Self {
            intro_words: file.intro_words,
            decision_tree: file.decision_tree,
            quiz: file.quiz,
            game: file.game,
            pages,
            chat: file.chat,
            citations: file.citations,
        };
        validate::check(&repo)?;
        Ok(repo)
    }

    /// The content asset compiled into the binary.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded asset itself is broken, which the test
    /// suite guards against.
    pub fn builtin() -> Result<Self, ContentError> {
        Self::parse(BUILTIN_YAML)
    }

    /// Load from `path` when given, otherwise fall back to the embedded asset.
    ///
    /// # Errors
    ///
    /// See [`ContentRepository::from_file`] and [`ContentRepository::builtin`].
    pub fn load(path: Option<&Path>) -> Result<Self, ContentError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let repo = Self::builtin()?;
                info!("Loaded built-in content");
                Ok(repo)
            }
        }
    }

    /// Words shown one at a time by the intro animation.
    pub fn intro_words(&self) -> &[String] {
        &self.intro_words
    }

    /// The swipe-card decision tree.
    pub const fn decision_tree(&self) -> &DecisionTree {
        &self.decision_tree
    }

    /// Quiz tables.
    pub const fn quiz(&self) -> &QuizContent {
        &self.quiz
    }

    /// Design game tables.
    pub const fn game(&self) -> &GameContent {
        &self.game
    }

    /// A single informational page.
    pub fn page(&self, id: PageId) -> Option<&InfoPage> {
        self.pages.get(&id)
    }

    /// All informational pages keyed by id.
    pub const fn pages(&self) -> &BTreeMap<PageId, InfoPage> {
        &self.pages
    }

    /// Chat screen texts.
    pub const fn chat(&self) -> &ChatContent {
        &self.chat
    }

    /// Citation sections listed by the credits overlay.
    pub fn citations(&self) -> &[CitationSection] {
        &self.citations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_asset_loads() {
        let repo = ContentRepository::builtin();
        assert!(repo.is_ok(), "builtin content failed: {:?}", repo.err());
    }

    #[test]
    fn load_without_path_uses_builtin() {
        let loaded = ContentRepository::load(None).ok();
        let builtin = ContentRepository::builtin().ok();
        assert!(loaded.is_some());
        assert_eq!(loaded, builtin);
    }

    #[test]
    fn missing_file_is_io_error() {
        let result =
            ContentRepository::from_file(Path::new("/nonexistent/greentrack-content.yaml"));
        assert!(matches!(result, Err(ContentError::Io { .. })));
    }

    #[test]
    fn malformed_yaml_is_yaml_error() {
        let result = ContentRepository::parse("intro_words: [unterminated");
        assert!(matches!(result, Err(ContentError::Yaml { .. })));
    }

    #[test]
    fn duplicate_page_is_rejected() {
        let yaml = BUILTIN_YAML.replacen(
            "  - id: knowledge_check\n    title: \"Test Your Knowledge\"\n",
            "  - id: knowledge_check\n    title: \"Test Your Knowledge\"\n  - id: knowledge_check\n    title: \"Again\"\n",
            1,
        );
        let result = ContentRepository::parse(&yaml);
        assert!(matches!(result, Err(ContentError::Invalid { .. })));
    }

    #[test]
    fn every_tier_has_a_message() {
        let repo = ContentRepository::builtin();
        assert!(repo.is_ok());
        let Ok(repo) = repo else { return };
        for tier in FeedbackTier::ALL {
            assert!(!repo.game().message(tier).is_empty(), "no message for {tier:?}");
        }
    }
}
