use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{DeckId, QuestionId};
use crate::model::tag::TagName;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("{field} must be within [0, 1], got {value}")]
    InvalidRate { field: &'static str, value: f32 },

    #[error("unknown depth: {0}")]
    UnknownDepth(String),
}

//
// ─── DEPTH ─────────────────────────────────────────────────────────────────────
//

/// How personal a prompt gets. Used for display and filtering only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Depth {
    #[default]
    Light,
    Medium,
    Deep,
}

impl Depth {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Depth::Light => "light",
            Depth::Medium => "medium",
            Depth::Deep => "deep",
        }
    }

    /// Parses the storage representation.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::UnknownDepth` for unrecognized values.
    pub fn parse(value: &str) -> Result<Self, QuestionError> {
        match value.trim() {
            "light" => Ok(Depth::Light),
            "medium" => Ok(Depth::Medium),
            "deep" => Ok(Depth::Deep),
            other => Err(QuestionError::UnknownDepth(other.to_string())),
        }
    }
}

//
// ─── STATS ─────────────────────────────────────────────────────────────────────
//

/// Engagement statistics shown next to a prompt. The card stack never reads them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QuestionStats {
    completion_rate: f32,
    skip_rate: f32,
}

impl QuestionStats {
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidRate` if either rate is not a finite value in `[0, 1]`.
    pub fn new(completion_rate: f32, skip_rate: f32) -> Result<Self, QuestionError> {
        check_rate("completion_rate", completion_rate)?;
        check_rate("skip_rate", skip_rate)?;
        Ok(Self {
            completion_rate,
            skip_rate,
        })
    }

    #[must_use]
    pub fn completion_rate(&self) -> f32 {
        self.completion_rate
    }

    #[must_use]
    pub fn skip_rate(&self) -> f32 {
        self.skip_rate
    }
}

fn check_rate(field: &'static str, value: f32) -> Result<(), QuestionError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(QuestionError::InvalidRate { field, value })
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single conversation prompt belonging to a deck.
///
/// Questions are created outside the card stack (seed data or a remote fetch)
/// and are read-only once a session holds them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    deck_id: DeckId,
    text: String,
    depth: Depth,
    tags: BTreeSet<TagName>,
    stats: QuestionStats,
}

impl Question {
    /// Creates a new question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if text is empty or whitespace-only.
    pub fn new(
        id: QuestionId,
        deck_id: DeckId,
        text: impl Into<String>,
        depth: Depth,
        tags: impl IntoIterator<Item = TagName>,
        stats: QuestionStats,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        let text = text.trim();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }

        Ok(Self {
            id,
            deck_id,
            text: text.to_owned(),
            depth,
            tags: tags.into_iter().collect(),
            stats,
        })
    }

    /// Shorthand for a plain prompt without tags or stats.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if text is empty or whitespace-only.
    pub fn text_only(
        id: QuestionId,
        deck_id: DeckId,
        text: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        Self::new(id, deck_id, text, Depth::Light, [], QuestionStats::default())
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn deck_id(&self) -> DeckId {
        self.deck_id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn depth(&self) -> Depth {
        self.depth
    }

    pub fn tags(&self) -> impl Iterator<Item = &TagName> {
        self.tags.iter()
    }

    #[must_use]
    pub fn has_tag(&self, tag: &TagName) -> bool {
        self.tags.contains(tag)
    }

    #[must_use]
    pub fn stats(&self) -> QuestionStats {
        self.stats
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
