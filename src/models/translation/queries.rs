use sqlx::{PgPool, Postgres, Transaction};

use super::types::*;
use crate::errors::AppError;
use crate::workflow::TranslationStatus;

#[derive(sqlx::FromRow)]
pub(super) struct TranslationRow {
    pub id: i64,
    pub original_story_id: i64,
    pub target_language: String,
    pub status: String,
    pub assigned_to_id: Option<i64>,
    pub translated_story_id: Option<i64>,
    pub rejection_reason: Option<String>,
    pub version: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl TranslationRow {
    pub(super) fn into_translation(self) -> Result<Translation, AppError> {
        let status = self
            .status
            .parse::<TranslationStatus>()
            .map_err(|e| AppError::decode(format!("translations.status: {e}")))?;
        Ok(Translation {
            status,
            id: self.id,
            original_story_id: self.original_story_id,
            target_language: self.target_language,
            assigned_to_id: self.assigned_to_id,
            translated_story_id: self.translated_story_id,
            rejection_reason: self.rejection_reason,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub(super) const TRANSLATION_COLUMNS: &str = "id, original_story_id, target_language, status, \
    assigned_to_id, translated_story_id, rejection_reason, version, created_at, updated_at";

/// Assign a translation for a story. One row per (story, language); a
/// second assignment for the same language is a `Conflict`.
pub async fn create(
    pool: &PgPool,
    story_id: i64,
    form: &TranslationForm,
) -> Result<Translation, AppError> {
    let result = sqlx::query_as::<_, TranslationRow>(&format!(
        "INSERT INTO translations (original_story_id, target_language, assigned_to_id) \
         VALUES ($1, $2, $3) \
         RETURNING {TRANSLATION_COLUMNS}"
    ))
    .bind(story_id)
    .bind(form.target_language.trim())
    .bind(form.assigned_to_id)
    .fetch_one(pool)
    .await;

    match result {
        Ok(row) => row.into_translation(),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict(
            format!(
                "A translation to {} already exists for this story",
                form.target_language.trim()
            ),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Translation>, AppError> {
    let row = sqlx::query_as::<_, TranslationRow>(&format!(
        "SELECT {TRANSLATION_COLUMNS} FROM translations WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(TranslationRow::into_translation).transpose()
}

pub(super) async fn find_by_id_for_update(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
) -> Result<Option<Translation>, AppError> {
    let row = sqlx::query_as::<_, TranslationRow>(&format!(
        "SELECT {TRANSLATION_COLUMNS} FROM translations WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;
    row.map(TranslationRow::into_translation).transpose()
}

/// All translations for a story, stable order by language.
pub async fn find_all_for_story(
    pool: &PgPool,
    story_id: i64,
) -> Result<Vec<Translation>, AppError> {
    let rows = sqlx::query_as::<_, TranslationRow>(&format!(
        "SELECT {TRANSLATION_COLUMNS} FROM translations \
         WHERE original_story_id = $1 ORDER BY target_language"
    ))
    .bind(story_id)
    .fetch_all(pool)
    .await?;
    rows.into_iter()
        .map(TranslationRow::into_translation)
        .collect()
}
