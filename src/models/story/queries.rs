use sqlx::{PgPool, Postgres, Transaction};

use super::types::*;
use crate::errors::AppError;
use crate::workflow::{ReturnStage, StoryStatus};

#[derive(sqlx::FromRow)]
pub(super) struct StoryRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: String,
    pub priority: String,
    pub language: String,
    pub author_id: i64,
    pub reviewer_id: Option<i64>,
    pub assigned_to_id: Option<i64>,
    pub category_id: Option<i64>,
    pub original_story_id: Option<i64>,
    pub revision_returns_to: Option<String>,
    pub rejection_reason: Option<String>,
    pub translations_skipped: bool,
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl StoryRow {
    pub(super) fn into_story(self) -> Result<Story, AppError> {
        let status = self
            .status
            .parse::<StoryStatus>()
            .map_err(|e| AppError::decode(format!("stories.status: {e}")))?;
        let revision_returns_to = self
            .revision_returns_to
            .as_deref()
            .map(str::parse::<ReturnStage>)
            .transpose()
            .map_err(|e| AppError::decode(format!("stories.revision_returns_to: {e}")))?;

        Ok(Story {
            status,
            revision_returns_to,
            id: self.id,
            title: self.title,
            slug: self.slug,
            content: self.content,
            priority: self.priority,
            language: self.language,
            author_id: self.author_id,
            reviewer_id: self.reviewer_id,
            assigned_to_id: self.assigned_to_id,
            category_id: self.category_id,
            original_story_id: self.original_story_id,
            rejection_reason: self.rejection_reason,
            translations_skipped: self.translations_skipped,
            published_at: self.published_at,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub(super) const STORY_COLUMNS: &str = "id, title, slug, content, status, priority, \
    language, author_id, reviewer_id, assigned_to_id, category_id, original_story_id, \
    revision_returns_to, rejection_reason, translations_skipped, published_at, version, \
    created_at, updated_at";

/// Generate a slug from a title: lowercase, spaces to dashes, keep only
/// alphanumeric and dashes.
pub fn slug_from_title(title: &str) -> String {
    title
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect()
}

/// Create a story in DRAFT for the given author. A duplicate slug is a
/// `Conflict`, surfaced from the unique index.
pub async fn create(pool: &PgPool, form: &StoryForm, author_id: i64) -> Result<Story, AppError> {
    let slug = slug_from_title(&form.title);

    let result = sqlx::query_as::<_, StoryRow>(&format!(
        "INSERT INTO stories (title, slug, content, priority, language, category_id, \
                              original_story_id, author_id) \
         VALUES ($1, $2, $3, COALESCE($4, 'NORMAL'), COALESCE($5, 'en'), $6, $7, $8) \
         RETURNING {STORY_COLUMNS}"
    ))
    .bind(form.title.trim())
    .bind(&slug)
    .bind(&form.content)
    .bind(form.priority.as_deref())
    .bind(form.language.as_deref())
    .bind(form.category_id)
    .bind(form.original_story_id)
    .bind(author_id)
    .fetch_one(pool)
    .await;

    match result {
        Ok(row) => row.into_story(),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict(
            format!("A story with slug '{slug}' already exists"),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Story>, AppError> {
    let row = sqlx::query_as::<_, StoryRow>(&format!(
        "SELECT {STORY_COLUMNS} FROM stories WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(StoryRow::into_story).transpose()
}

/// Lock and load a story inside an open transaction (transition executor).
pub(super) async fn find_by_id_for_update(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
) -> Result<Option<Story>, AppError> {
    let row = sqlx::query_as::<_, StoryRow>(&format!(
        "SELECT {STORY_COLUMNS} FROM stories WHERE id = $1 FOR UPDATE"
    ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    row.map(StoryRow::into_story).transpose()
}

/// Staff list view with optional filters, newest-updated first.
pub async fn find_filtered(
    pool: &PgPool,
    filter: &StoryFilter,
) -> Result<Vec<StoryListItem>, AppError> {
    #[derive(sqlx::FromRow)]
    struct Row {
        id: i64,
        title: String,
        slug: String,
        status: String,
        priority: String,
        language: String,
        author_id: i64,
        author_name: String,
        category_id: Option<i64>,
        published_at: Option<chrono::DateTime<chrono::Utc>>,
        updated_at: chrono::DateTime<chrono::Utc>,
    }

    let page = filter.page.unwrap_or(1).max(1);
    let per_page = filter.per_page.unwrap_or(25).clamp(1, 100);

    let rows = sqlx::query_as::<_, Row>(
        "SELECT s.id, s.title, s.slug, s.status, s.priority, s.language, s.author_id, \
                u.display_name AS author_name, s.category_id, s.published_at, s.updated_at \
         FROM stories s \
         JOIN staff_users u ON s.author_id = u.id \
         WHERE ($1::text IS NULL OR s.status = $1) \
           AND ($2::bigint IS NULL OR s.author_id = $2) \
           AND ($3::bigint IS NULL OR s.category_id = $3) \
           AND ($4::text IS NULL OR s.language = $4) \
         ORDER BY s.updated_at DESC \
         LIMIT $5 OFFSET $6",
    )
    .bind(filter.status.map(|s| s.as_str()))
    .bind(filter.author_id)
    .bind(filter.category_id)
    .bind(filter.language.as_deref())
    .bind(per_page)
    .bind((page - 1) * per_page)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|r| {
            let status = r
                .status
                .parse::<StoryStatus>()
                .map_err(|e| AppError::decode(format!("stories.status: {e}")))?;
            Ok(StoryListItem {
                status,
                id: r.id,
                title: r.title,
                slug: r.slug,
                priority: r.priority,
                language: r.language,
                author_id: r.author_id,
                author_name: r.author_name,
                category_id: r.category_id,
                published_at: r.published_at,
                updated_at: r.updated_at,
            })
        })
        .collect()
}

/// Apply a content/metadata update. Absent fields keep their stored values;
/// any edit bumps the version so concurrent transitions see it.
pub async fn update(
    pool: &PgPool,
    id: i64,
    form: &StoryUpdateForm,
    fetched_version: i64,
) -> Result<Story, AppError> {
    let row = sqlx::query_as::<_, StoryRow>(&format!(
        "UPDATE stories SET \
             title = COALESCE($2, title), \
             content = COALESCE($3, content), \
             priority = COALESCE($4, priority), \
             language = COALESCE($5, language), \
             category_id = COALESCE($6, category_id), \
             translations_skipped = COALESCE($7, translations_skipped), \
             version = version + 1, \
             updated_at = NOW() \
         WHERE id = $1 AND version = $8 \
         RETURNING {STORY_COLUMNS}"
    ))
    .bind(id)
    .bind(form.title.as_deref().map(str::trim))
    .bind(form.content.as_deref())
    .bind(form.priority.as_deref())
    .bind(form.language.as_deref())
    .bind(form.category_id)
    .bind(form.translations_skipped)
    .bind(fetched_version)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => row.into_story(),
        None => Err(AppError::Conflict(
            "Story was modified by someone else; reload and retry".to_string(),
        )),
    }
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<(), AppError> {
    let done = sqlx::query("DELETE FROM stories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if done.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// Count stories with a given status (dashboard tiles).
pub async fn count_by_status(pool: &PgPool, status: StoryStatus) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stories WHERE status = $1")
        .bind(status.as_str())
        .fetch_one(pool)
        .await
        .unwrap_or(0)
}

#[derive(sqlx::FromRow)]
struct PublishedRow {
    id: i64,
    title: String,
    slug: String,
    content: String,
    language: String,
    category: Option<String>,
    published_at: chrono::DateTime<chrono::Utc>,
}

impl PublishedRow {
    fn into_published(self) -> PublishedStory {
        PublishedStory {
            id: self.id,
            title: self.title,
            slug: self.slug,
            content: self.content,
            language: self.language,
            category: self.category,
            published_at: self.published_at,
        }
    }
}

/// Station feed: published stories newest first, optionally by language.
pub async fn find_published(
    pool: &PgPool,
    language: Option<&str>,
    limit: i64,
) -> Result<Vec<PublishedStory>, AppError> {
    let rows = sqlx::query_as::<_, PublishedRow>(
        "SELECT s.id, s.title, s.slug, s.content, s.language, c.name AS category, \
                s.published_at \
         FROM stories s \
         LEFT JOIN categories c ON s.category_id = c.id \
         WHERE s.status = 'PUBLISHED' AND s.published_at IS NOT NULL \
           AND ($1::text IS NULL OR s.language = $1) \
         ORDER BY s.published_at DESC \
         LIMIT $2",
    )
    .bind(language)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(PublishedRow::into_published).collect())
}

pub async fn find_published_by_slug(
    pool: &PgPool,
    slug: &str,
) -> Result<Option<PublishedStory>, AppError> {
    let row = sqlx::query_as::<_, PublishedRow>(
        "SELECT s.id, s.title, s.slug, s.content, s.language, c.name AS category, \
                s.published_at \
         FROM stories s \
         LEFT JOIN categories c ON s.category_id = c.id \
         WHERE s.status = 'PUBLISHED' AND s.published_at IS NOT NULL AND s.slug = $1",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(PublishedRow::into_published))
}
