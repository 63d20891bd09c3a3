use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::session::current_user;
use crate::errors::AppError;
use crate::models::bulletin::{self, RundownAppendForm, RundownSlotForm};
use crate::models::story;
use crate::workflow::{Action, ActionContext, can};

async fn require_reorder_permission(
    pool: &PgPool,
    session: &Session,
    bulletin_id: i64,
) -> Result<crate::auth::session::CurrentUser, AppError> {
    let actor = current_user(session)?;
    let existing = bulletin::find_by_id(pool, bulletin_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let ctx = ActionContext::new(actor.id, Some(existing.author_id));
    if !can(actor.role, Action::ReorderBulletin(existing.status), &ctx) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not change this bulletin's rundown while it is {}",
            actor.role, existing.status
        )));
    }
    Ok(actor)
}

/// PUT /api/v1/bulletins/{id}/stories
///
/// Replaces the rundown order transactionally. The slots must cover
/// exactly the bulletin's member stories with contiguous positions; any
/// mismatch is rejected before a single row changes.
pub async fn replace(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Json<Vec<RundownSlotForm>>,
) -> Result<HttpResponse, AppError> {
    let bulletin_id = path.into_inner();
    let actor = require_reorder_permission(&pool, &session, bulletin_id).await?;

    bulletin::reorder(&pool, bulletin_id, &form, &actor).await?;

    let rundown = bulletin::rundown(&pool, bulletin_id).await?;
    Ok(HttpResponse::Ok().json(rundown))
}

/// POST /api/v1/bulletins/{id}/stories — append a story at the end.
pub async fn append(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Json<RundownAppendForm>,
) -> Result<HttpResponse, AppError> {
    let bulletin_id = path.into_inner();
    let actor = require_reorder_permission(&pool, &session, bulletin_id).await?;

    // Only real stories can be read on air.
    story::find_by_id(&pool, form.story_id)
        .await?
        .ok_or(AppError::NotFound)?;

    bulletin::append_story(&pool, bulletin_id, form.story_id).await?;

    let details = serde_json::json!({ "story_id": form.story_id });
    if let Err(e) = crate::audit::log(&pool, actor.id, "bulletin.story_added", "bulletin", bulletin_id, details).await {
        log::warn!("audit write failed for bulletin.story_added {bulletin_id}: {e}");
    }

    let rundown = bulletin::rundown(&pool, bulletin_id).await?;
    Ok(HttpResponse::Ok().json(rundown))
}

/// DELETE /api/v1/bulletins/{id}/stories/{story_id}
pub async fn remove(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
    let (bulletin_id, story_id) = path.into_inner();
    let actor = require_reorder_permission(&pool, &session, bulletin_id).await?;

    bulletin::remove_story(&pool, bulletin_id, story_id).await?;

    let details = serde_json::json!({ "story_id": story_id });
    if let Err(e) = crate::audit::log(&pool, actor.id, "bulletin.story_removed", "bulletin", bulletin_id, details).await {
        log::warn!("audit write failed for bulletin.story_removed {bulletin_id}: {e}");
    }

    let rundown = bulletin::rundown(&pool, bulletin_id).await?;
    Ok(HttpResponse::Ok().json(rundown))
}
