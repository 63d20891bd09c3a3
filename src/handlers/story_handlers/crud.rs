use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::session::current_user;
use crate::auth::validate;
use crate::errors::AppError;
use crate::models::category;
use crate::models::story::{self, StoryFilter, StoryForm, StoryUpdateForm};
use crate::workflow::{Action, ActionContext, can};

/// GET /api/v1/stories
pub async fn list(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<StoryFilter>,
) -> Result<HttpResponse, AppError> {
    current_user(&session)?;
    let items = story::find_filtered(&pool, &query).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// POST /api/v1/stories
pub async fn create(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Json<StoryForm>,
) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    let ctx = ActionContext::new(actor.id, None);
    if !can(actor.role, Action::CreateStory, &ctx) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not create stories",
            actor.role
        )));
    }

    if let Some(msg) = validate::validate_required(&form.title, "Title", 200) {
        return Err(AppError::Validation(msg));
    }
    if let Some(lang) = form.language.as_deref() {
        if let Some(msg) = validate::validate_language(lang) {
            return Err(AppError::Validation(msg));
        }
    }
    if let Some(category_id) = form.category_id {
        if category::find_by_id(&pool, category_id).await?.is_none() {
            return Err(AppError::Validation(format!(
                "Category {category_id} does not exist"
            )));
        }
    }

    let created = story::create(&pool, &form, actor.id).await?;

    let details = serde_json::json!({
        "title": created.title,
        "slug": created.slug,
    });
    if let Err(e) = crate::audit::log(&pool, actor.id, "story.created", "story", created.id, details).await {
        log::warn!("audit write failed for story.created {}: {e}", created.id);
    }

    Ok(HttpResponse::Created().json(created))
}

/// GET /api/v1/stories/{id}
pub async fn read(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    current_user(&session)?;
    let story = story::find_by_id(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(story))
}

/// PUT /api/v1/stories/{id}
pub async fn update(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Json<StoryUpdateForm>,
) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    let story_id = path.into_inner();

    let existing = story::find_by_id(&pool, story_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let ctx = ActionContext::new(actor.id, Some(existing.author_id));
    if !can(actor.role, Action::EditStory(existing.status), &ctx) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not edit this story while it is {}",
            actor.role, existing.status
        )));
    }
    if form.translations_skipped.is_some() && !can(actor.role, Action::SkipTranslations, &ctx) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not change the translation-skip flag",
            actor.role
        )));
    }

    if let Some(title) = form.title.as_deref() {
        if let Some(msg) = validate::validate_required(title, "Title", 200) {
            return Err(AppError::Validation(msg));
        }
    }
    if let Some(lang) = form.language.as_deref() {
        if let Some(msg) = validate::validate_language(lang) {
            return Err(AppError::Validation(msg));
        }
    }
    if let Some(category_id) = form.category_id {
        if category::find_by_id(&pool, category_id).await?.is_none() {
            return Err(AppError::Validation(format!(
                "Category {category_id} does not exist"
            )));
        }
    }
    if let Some(expected) = form.expected_version {
        if expected != existing.version {
            return Err(AppError::Conflict(format!(
                "Story version is {}, request expected {expected}",
                existing.version
            )));
        }
    }

    let updated = story::update(&pool, story_id, &form, existing.version).await?;

    let details = serde_json::json!({ "title": updated.title });
    if let Err(e) = crate::audit::log(&pool, actor.id, "story.updated", "story", story_id, details).await {
        log::warn!("audit write failed for story.updated {story_id}: {e}");
    }

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/v1/stories/{id}
pub async fn delete(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    let story_id = path.into_inner();

    let existing = story::find_by_id(&pool, story_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let ctx = ActionContext::new(actor.id, Some(existing.author_id));
    if !can(actor.role, Action::DeleteStory(existing.status), &ctx) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not delete this story while it is {}",
            actor.role, existing.status
        )));
    }

    story::delete(&pool, story_id).await?;

    let details = serde_json::json!({ "title": existing.title, "slug": existing.slug });
    if let Err(e) = crate::audit::log(&pool, actor.id, "story.deleted", "story", story_id, details).await {
        log::warn!("audit write failed for story.deleted {story_id}: {e}");
    }

    Ok(HttpResponse::NoContent().finish())
}
