use convo_core::model::{Deck, DeckId};

use super::SqliteRepository;
use super::mapping::{id_to_i64, map_deck_row};
use crate::repository::{DeckRepository, StorageError};

#[async_trait::async_trait]
impl DeckRepository for SqliteRepository {
    async fn upsert_deck(&self, deck: &Deck) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO decks (id, name, description, category, question_count)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                category = excluded.category,
                question_count = excluded.question_count
            ",
        )
        .bind(id_to_i64("deck_id", deck.id().value())?)
        .bind(deck.name().to_string())
        .bind(deck.description().map(ToString::to_string))
        .bind(deck.category().as_str())
        .bind(deck.declared_question_count().map(i64::from))
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn get_deck(&self, id: DeckId) -> Result<Option<Deck>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, name, description, category, question_count
            FROM decks WHERE id = ?1
            ",
        )
        .bind(id_to_i64("deck_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.as_ref().map(map_deck_row).transpose()
    }

    async fn list_decks(&self, limit: u32) -> Result<Vec<Deck>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, name, description, category, question_count
            FROM decks
            ORDER BY id ASC
            LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_deck_row).collect()
    }
}
