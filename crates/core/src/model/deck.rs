use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::DeckId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("deck name cannot be empty")]
    EmptyName,

    #[error("unknown deck category: {0}")]
    UnknownCategory(String),
}

//
// ─── CATEGORY ──────────────────────────────────────────────────────────────────
//

/// Deck category. Selects the theme color of the deck and its cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckCategory {
    Relationship,
    Friendship,
    Family,
    SelfReflection,
    Fun,
    Deep,
}

impl DeckCategory {
    pub const ALL: [DeckCategory; 6] = [
        DeckCategory::Relationship,
        DeckCategory::Friendship,
        DeckCategory::Family,
        DeckCategory::SelfReflection,
        DeckCategory::Fun,
        DeckCategory::Deep,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DeckCategory::Relationship => "relationship",
            DeckCategory::Friendship => "friendship",
            DeckCategory::Family => "family",
            DeckCategory::SelfReflection => "self_reflection",
            DeckCategory::Fun => "fun",
            DeckCategory::Deep => "deep",
        }
    }

    /// Parses the storage representation.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::UnknownCategory` for unrecognized values.
    pub fn parse(value: &str) -> Result<Self, DeckError> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value.trim())
            .ok_or_else(|| DeckError::UnknownCategory(value.to_string()))
    }

    /// Theme color (CSS hex) used for the deck tile and its cards.
    #[must_use]
    pub fn theme_color(self) -> &'static str {
        match self {
            DeckCategory::Relationship => "#E85D75",
            DeckCategory::Friendship => "#F2A541",
            DeckCategory::Family => "#4F9D69",
            DeckCategory::SelfReflection => "#5B7DB1",
            DeckCategory::Fun => "#9B5DE5",
            DeckCategory::Deep => "#2E3A59",
        }
    }
}

//
// ─── DECK ──────────────────────────────────────────────────────────────────────
//

/// A named, categorized collection of questions.
///
/// The declared question count comes from the catalog; when it is missing the
/// count is derived from the questions actually supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    id: DeckId,
    name: String,
    description: Option<String>,
    category: DeckCategory,
    declared_question_count: Option<u32>,
}

impl Deck {
    /// Creates a new Deck.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::EmptyName` if name is empty or whitespace-only.
    pub fn new(
        id: DeckId,
        name: impl Into<String>,
        description: Option<String>,
        category: DeckCategory,
        declared_question_count: Option<u32>,
    ) -> Result<Self, DeckError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DeckError::EmptyName);
        }

        let description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id,
            name: name.trim().to_owned(),
            description,
            category,
            declared_question_count,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> DeckId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn category(&self) -> DeckCategory {
        self.category
    }

    #[must_use]
    pub fn theme_color(&self) -> &'static str {
        self.category.theme_color()
    }

    #[must_use]
    pub fn declared_question_count(&self) -> Option<u32> {
        self.declared_question_count
    }

    /// Declared count if the catalog provides one, otherwise `derived`.
    #[must_use]
    pub fn question_count(&self, derived: usize) -> usize {
        self.declared_question_count
            .and_then(|count| usize::try_from(count).ok())
            .unwrap_or(derived)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_new_rejects_empty_name() {
        let err = Deck::new(DeckId::new(1), "   ", None, DeckCategory::Fun, None).unwrap_err();
        assert_eq!(err, DeckError::EmptyName);
    }

    #[test]
    fn deck_trims_name_and_filters_empty_description() {
        let deck = Deck::new(
            DeckId::new(1),
            "  Date Night  ",
            Some("   ".into()),
            DeckCategory::Relationship,
            None,
        )
        .unwrap();

        assert_eq!(deck.name(), "Date Night");
        assert_eq!(deck.description(), None);
        assert_eq!(deck.theme_color(), "#E85D75");
    }

    #[test]
    fn question_count_prefers_declared() {
        let declared =
            Deck::new(DeckId::new(1), "A", None, DeckCategory::Family, Some(40)).unwrap();
        let derived = Deck::new(DeckId::new(2), "B", None, DeckCategory::Family, None).unwrap();

        assert_eq!(declared.question_count(12), 40);
        assert_eq!(derived.question_count(12), 12);
    }

    #[test]
    fn category_round_trips_storage_names() {
        for category in DeckCategory::ALL {
            assert_eq!(DeckCategory::parse(category.as_str()).unwrap(), category);
        }
        assert!(matches!(
            DeckCategory::parse("horror"),
            Err(DeckError::UnknownCategory(_))
        ));
    }
}
