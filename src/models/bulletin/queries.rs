use sqlx::{PgPool, Postgres, Transaction};

use super::types::*;
use crate::errors::AppError;
use crate::workflow::BulletinStatus;

#[derive(sqlx::FromRow)]
pub(super) struct BulletinRow {
    pub id: i64,
    pub title: String,
    pub language: String,
    pub status: String,
    pub author_id: i64,
    pub reviewer_id: Option<i64>,
    pub rejection_reason: Option<String>,
    pub airs_at: Option<chrono::DateTime<chrono::Utc>>,
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl BulletinRow {
    pub(super) fn into_bulletin(self) -> Result<Bulletin, AppError> {
        let status = self
            .status
            .parse::<BulletinStatus>()
            .map_err(|e| AppError::decode(format!("bulletins.status: {e}")))?;
        Ok(Bulletin {
            status,
            id: self.id,
            title: self.title,
            language: self.language,
            author_id: self.author_id,
            reviewer_id: self.reviewer_id,
            rejection_reason: self.rejection_reason,
            airs_at: self.airs_at,
            published_at: self.published_at,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub(super) const BULLETIN_COLUMNS: &str = "id, title, language, status, author_id, reviewer_id, \
    rejection_reason, airs_at, published_at, version, created_at, updated_at";

pub async fn create(pool: &PgPool, form: &BulletinForm, author_id: i64) -> Result<Bulletin, AppError> {
    let row = sqlx::query_as::<_, BulletinRow>(&format!(
        "INSERT INTO bulletins (title, language, airs_at, author_id) \
         VALUES ($1, COALESCE($2, 'en'), $3, $4) \
         RETURNING {BULLETIN_COLUMNS}"
    ))
    .bind(form.title.trim())
    .bind(form.language.as_deref())
    .bind(form.airs_at)
    .bind(author_id)
    .fetch_one(pool)
    .await?;
    row.into_bulletin()
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Bulletin>, AppError> {
    let row = sqlx::query_as::<_, BulletinRow>(&format!(
        "SELECT {BULLETIN_COLUMNS} FROM bulletins WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(BulletinRow::into_bulletin).transpose()
}

pub(super) async fn find_by_id_for_update(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
) -> Result<Option<Bulletin>, AppError> {
    let row = sqlx::query_as::<_, BulletinRow>(&format!(
        "SELECT {BULLETIN_COLUMNS} FROM bulletins WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;
    row.map(BulletinRow::into_bulletin).transpose()
}

/// Staff list, newest-updated first, optionally filtered by status.
pub async fn find_filtered(
    pool: &PgPool,
    status: Option<BulletinStatus>,
    page: i64,
    per_page: i64,
) -> Result<Vec<Bulletin>, AppError> {
    let page = page.max(1);
    let per_page = per_page.clamp(1, 100);

    let rows = sqlx::query_as::<_, BulletinRow>(&format!(
        "SELECT {BULLETIN_COLUMNS} FROM bulletins \
         WHERE ($1::text IS NULL OR status = $1) \
         ORDER BY updated_at DESC LIMIT $2 OFFSET $3"
    ))
    .bind(status.map(|s| s.as_str()))
    .bind(per_page)
    .bind((page - 1) * per_page)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(BulletinRow::into_bulletin).collect()
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    form: &BulletinUpdateForm,
    fetched_version: i64,
) -> Result<Bulletin, AppError> {
    let row = sqlx::query_as::<_, BulletinRow>(&format!(
        "UPDATE bulletins SET \
             title = COALESCE($2, title), \
             language = COALESCE($3, language), \
             airs_at = COALESCE($4, airs_at), \
             version = version + 1, \
             updated_at = NOW() \
         WHERE id = $1 AND version = $5 \
         RETURNING {BULLETIN_COLUMNS}"
    ))
    .bind(id)
    .bind(form.title.as_deref().map(str::trim))
    .bind(form.language.as_deref())
    .bind(form.airs_at)
    .bind(fetched_version)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => row.into_bulletin(),
        None => Err(AppError::Conflict(
            "Bulletin was modified by someone else; reload and retry".to_string(),
        )),
    }
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<(), AppError> {
    let done = sqlx::query("DELETE FROM bulletins WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if done.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

pub async fn count_by_status(pool: &PgPool, status: BulletinStatus) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bulletins WHERE status = $1")
        .bind(status.as_str())
        .fetch_one(pool)
        .await
        .unwrap_or(0)
}

/// The bulletin's rundown in on-air order.
pub async fn rundown(pool: &PgPool, bulletin_id: i64) -> Result<Vec<RundownEntry>, AppError> {
    let entries = sqlx::query_as::<_, RundownEntryRow>(
        "SELECT bs.story_id, bs.position, s.title, s.slug \
         FROM bulletin_stories bs \
         JOIN stories s ON bs.story_id = s.id \
         WHERE bs.bulletin_id = $1 \
         ORDER BY bs.position",
    )
    .bind(bulletin_id)
    .fetch_all(pool)
    .await?;
    Ok(entries.into_iter().map(RundownEntryRow::into_entry).collect())
}

#[derive(sqlx::FromRow)]
struct RundownEntryRow {
    story_id: i64,
    position: i32,
    title: String,
    slug: String,
}

impl RundownEntryRow {
    fn into_entry(self) -> RundownEntry {
        RundownEntry {
            story_id: self.story_id,
            position: self.position,
            title: self.title,
            slug: self.slug,
        }
    }
}

/// Append a story at the end of the rundown. Adding the same story twice
/// is a `Conflict`; a missing story id is `NotFound`.
pub async fn append_story(
    pool: &PgPool,
    bulletin_id: i64,
    story_id: i64,
) -> Result<(), AppError> {
    let result = sqlx::query(
        "INSERT INTO bulletin_stories (bulletin_id, story_id, position) \
         SELECT $1, $2, COALESCE(MAX(position), 0) + 1 \
         FROM bulletin_stories WHERE bulletin_id = $1",
    )
    .bind(bulletin_id)
    .bind(story_id)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict(
            "Story is already in this bulletin".to_string(),
        )),
        Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
            Err(AppError::NotFound)
        }
        Err(e) => Err(e.into()),
    }
}

/// Remove a story and close the gap so positions stay contiguous.
pub async fn remove_story(
    pool: &PgPool,
    bulletin_id: i64,
    story_id: i64,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query(
        "DELETE FROM bulletin_stories WHERE bulletin_id = $1 AND story_id = $2",
    )
    .bind(bulletin_id)
    .bind(story_id)
    .execute(&mut *tx)
    .await?;
    if removed.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    // Two-step resequence: shift out of the way first so the unique
    // (bulletin_id, position) index never sees a duplicate mid-update.
    sqlx::query(
        "UPDATE bulletin_stories SET position = -position WHERE bulletin_id = $1",
    )
    .bind(bulletin_id)
    .execute(&mut *tx)
    .await?;
    sqlx::query(
        "UPDATE bulletin_stories bs SET position = ranked.new_position \
         FROM (SELECT story_id, ROW_NUMBER() OVER (ORDER BY position DESC) AS new_position \
               FROM bulletin_stories WHERE bulletin_id = $1) ranked \
         WHERE bs.bulletin_id = $1 AND bs.story_id = ranked.story_id",
    )
    .bind(bulletin_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
