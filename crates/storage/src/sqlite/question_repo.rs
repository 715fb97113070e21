use convo_core::model::{DeckId, Question};

use super::SqliteRepository;
use super::mapping::{encode_tags, id_to_i64, map_question_row};
use crate::repository::{QuestionRepository, StorageError};

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError> {
        let stats = question.stats();
        sqlx::query(
            r"
            INSERT INTO questions (id, deck_id, text, depth, tags, completion_rate, skip_rate)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id, deck_id) DO UPDATE SET
                text = excluded.text,
                depth = excluded.depth,
                tags = excluded.tags,
                completion_rate = excluded.completion_rate,
                skip_rate = excluded.skip_rate
            ",
        )
        .bind(id_to_i64("question_id", question.id().value())?)
        .bind(id_to_i64("deck_id", question.deck_id().value())?)
        .bind(question.text().to_string())
        .bind(question.depth().as_str())
        .bind(encode_tags(question)?)
        .bind(f64::from(stats.completion_rate()))
        .bind(f64::from(stats.skip_rate()))
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => StorageError::NotFound,
            other => StorageError::Connection(other.to_string()),
        })?;

        Ok(())
    }

    async fn list_questions(&self, deck_id: DeckId) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, deck_id, text, depth, tags, completion_rate, skip_rate
            FROM questions
            WHERE deck_id = ?1
            ORDER BY id ASC
            ",
        )
        .bind(id_to_i64("deck_id", deck_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_question_row).collect()
    }
}
