//! Radio-station-facing consumption feeds. Public, read-only, and limited
//! to PUBLISHED content — stations poll these to pull copy and rundowns.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::{bulletin, story};
use crate::workflow::BulletinStatus;

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub language: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/v1/published/stories
pub async fn stories(
    pool: web::Data<PgPool>,
    query: web::Query<FeedQuery>,
) -> Result<HttpResponse, AppError> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let items = story::find_published(&pool, query.language.as_deref(), limit).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// GET /api/v1/published/stories/{slug}
pub async fn story_by_slug(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let story = story::find_published_by_slug(&pool, &path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(story))
}

/// GET /api/v1/published/bulletins
pub async fn bulletins(
    pool: web::Data<PgPool>,
    query: web::Query<FeedQuery>,
) -> Result<HttpResponse, AppError> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let items = bulletin::find_filtered(&pool, Some(BulletinStatus::Published), 1, limit).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// GET /api/v1/published/bulletins/{id} — bulletin plus ordered rundown.
pub async fn bulletin_by_id(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let bulletin_id = path.into_inner();
    let found = bulletin::find_by_id(&pool, bulletin_id)
        .await?
        .filter(|b| b.status == BulletinStatus::Published)
        .ok_or(AppError::NotFound)?;
    let rundown = bulletin::rundown(&pool, bulletin_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "bulletin": found,
        "rundown": rundown,
    })))
}
