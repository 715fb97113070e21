//! Built-in starter catalog, used by the `seed` binary and on first launch.

use convo_core::model::{
    Deck, DeckCategory, DeckId, Depth, Question, QuestionId, QuestionStats, TagName,
};

use crate::repository::{Storage, StorageError};

struct DeckSeed {
    id: u64,
    name: &'static str,
    description: &'static str,
    category: DeckCategory,
    prompts: &'static [(&'static str, Depth, &'static [&'static str])],
}

const CATALOG: &[DeckSeed] = &[
    DeckSeed {
        id: 1,
        name: "Date Night",
        description: "Light and playful prompts for two",
        category: DeckCategory::Relationship,
        prompts: &[
            ("What was your first impression of me?", Depth::Light, &["memories"]),
            ("Which trip of ours would you relive tomorrow?", Depth::Light, &["travel", "memories"]),
            ("What is a small thing I do that makes your day?", Depth::Medium, &["appreciation"]),
            ("When do you feel most connected to me?", Depth::Medium, &["intimacy"]),
            ("What dream have you never said out loud?", Depth::Deep, &["dreams"]),
            ("What does a perfect lazy Sunday look like for us?", Depth::Light, &["fun"]),
            ("How do you want us to handle disagreements better?", Depth::Deep, &["conflict"]),
            ("What tradition should we start this year?", Depth::Medium, &["future"]),
        ],
    },
    DeckSeed {
        id: 2,
        name: "Old Friends",
        description: "Catch up beyond the small talk",
        category: DeckCategory::Friendship,
        prompts: &[
            ("What is the best decision you made this year?", Depth::Medium, &["growth"]),
            ("Which memory of us still makes you laugh?", Depth::Light, &["memories", "fun"]),
            ("What are you secretly proud of?", Depth::Medium, &["pride"]),
            ("Who has changed your mind about something lately?", Depth::Deep, &["growth"]),
            ("What would you do with a free month?", Depth::Light, &["dreams"]),
            ("What do you wish people asked you more often?", Depth::Deep, &["connection"]),
        ],
    },
    DeckSeed {
        id: 3,
        name: "Looking Inward",
        description: "Questions to ask yourself",
        category: DeckCategory::SelfReflection,
        prompts: &[
            ("What drained your energy this week?", Depth::Medium, &["wellbeing"]),
            ("What are you avoiding right now, and why?", Depth::Deep, &["honesty"]),
            ("Which habit would your future self thank you for?", Depth::Medium, &["growth"]),
            ("When did you last feel completely at ease?", Depth::Light, &["wellbeing"]),
            ("What belief about yourself is ready to retire?", Depth::Deep, &["honesty", "growth"]),
        ],
    },
];

/// Decks and their questions in supply order.
///
/// # Errors
///
/// Returns `convo_core::Error` if a catalog entry fails validation.
pub fn sample_catalog() -> Result<Vec<(Deck, Vec<Question>)>, convo_core::Error> {
    let mut catalog = Vec::with_capacity(CATALOG.len());
    for seed in CATALOG {
        let deck_id = DeckId::new(seed.id);
        let deck = Deck::new(
            deck_id,
            seed.name,
            Some(seed.description.to_string()),
            seed.category,
            None,
        )?;
        let mut questions = Vec::with_capacity(seed.prompts.len());
        for (offset, (text, depth, tags)) in seed.prompts.iter().enumerate() {
            let tags = tags
                .iter()
                .map(|tag| TagName::new(*tag))
                .collect::<Result<Vec<_>, _>>()?;
            let question_id = seed.id * 100 + offset as u64 + 1;
            questions.push(Question::new(
                QuestionId::new(question_id),
                deck_id,
                *text,
                *depth,
                tags,
                QuestionStats::default(),
            )?);
        }
        catalog.push((deck, questions));
    }
    Ok(catalog)
}

/// Errors raised while writing the starter catalog.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SeedError {
    #[error(transparent)]
    Domain(#[from] convo_core::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Upsert the starter catalog. Returns the number of questions written.
///
/// # Errors
///
/// Returns `SeedError` if the catalog is invalid or storage rejects a write.
pub async fn seed_catalog(storage: &Storage) -> Result<usize, SeedError> {
    let mut written = 0;
    for (deck, questions) in sample_catalog()? {
        storage.decks.upsert_deck(&deck).await?;
        for question in &questions {
            storage.questions.upsert_question(question).await?;
        }
        tracing::debug!(deck_id = %deck.id(), questions = questions.len(), "seeded deck");
        written += questions.len();
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_valid_and_scoped() {
        let catalog = sample_catalog().unwrap();
        assert_eq!(catalog.len(), 3);
        for (deck, questions) in &catalog {
            assert!(!questions.is_empty());
            assert!(questions.iter().all(|q| q.deck_id() == deck.id()));
        }
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let storage = Storage::in_memory();
        let first = seed_catalog(&storage).await.unwrap();
        let second = seed_catalog(&storage).await.unwrap();
        assert_eq!(first, second);

        let decks = storage.decks.list_decks(10).await.unwrap();
        assert_eq!(decks.len(), 3);
        let questions = storage.questions.list_questions(DeckId::new(1)).await.unwrap();
        assert_eq!(questions.len(), 8);
    }
}
