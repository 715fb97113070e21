use convo_core::model::{
    Deck, DeckCategory, DeckId, Depth, Question, QuestionId, QuestionStats, TagName,
};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn id_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn deck_id_from_i64(v: i64) -> Result<DeckId, StorageError> {
    Ok(DeckId::new(i64_to_u64("deck_id", v)?))
}

pub(crate) fn question_id_from_i64(v: i64) -> Result<QuestionId, StorageError> {
    Ok(QuestionId::new(i64_to_u64("question_id", v)?))
}

/// Tags are stored as a JSON array of strings.
pub(crate) fn encode_tags(question: &Question) -> Result<String, StorageError> {
    let tags: Vec<&str> = question.tags().map(TagName::as_str).collect();
    serde_json::to_string(&tags).map_err(ser)
}

fn decode_tags(raw: &str) -> Result<Vec<TagName>, StorageError> {
    let names: Vec<String> = serde_json::from_str(raw).map_err(ser)?;
    names
        .into_iter()
        .map(|name| TagName::new(name).map_err(ser))
        .collect()
}

pub(crate) fn map_deck_row(row: &SqliteRow) -> Result<Deck, StorageError> {
    let category: String = row.try_get("category").map_err(ser)?;
    let question_count = row
        .try_get::<Option<i64>, _>("question_count")
        .map_err(ser)?
        .map(|count| {
            u32::try_from(count)
                .map_err(|_| StorageError::Serialization(format!("invalid question_count: {count}")))
        })
        .transpose()?;

    Deck::new(
        deck_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        row.try_get::<String, _>("name").map_err(ser)?,
        row.try_get::<Option<String>, _>("description").map_err(ser)?,
        DeckCategory::parse(&category).map_err(ser)?,
        question_count,
    )
    .map_err(ser)
}

pub(crate) fn map_question_row(row: &SqliteRow) -> Result<Question, StorageError> {
    let depth: String = row.try_get("depth").map_err(ser)?;
    let tags: String = row.try_get("tags").map_err(ser)?;
    #[allow(clippy::cast_possible_truncation)]
    let stats = QuestionStats::new(
        row.try_get::<f64, _>("completion_rate").map_err(ser)? as f32,
        row.try_get::<f64, _>("skip_rate").map_err(ser)? as f32,
    )
    .map_err(ser)?;

    Question::new(
        question_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        deck_id_from_i64(row.try_get::<i64, _>("deck_id").map_err(ser)?)?,
        row.try_get::<String, _>("text").map_err(ser)?,
        Depth::parse(&depth).map_err(ser)?,
        decode_tags(&tags)?,
        stats,
    )
    .map_err(ser)
}
