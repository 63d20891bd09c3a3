use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::session::current_user;
use crate::errors::AppError;
use crate::models::story::{self, StoryStatusForm};
use crate::workflow::publish::PublishChecklist;

/// POST /api/v1/stories/{id}/status
///
/// All role, edge, and companion-field checks happen inside the executor;
/// this handler only resolves the session.
pub async fn change_status(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Json<StoryStatusForm>,
) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    let updated = story::transition(&pool, path.into_inner(), &form, &actor).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// GET /api/v1/stories/{id}/publish-check
///
/// Read-only: reports every reason publishing is currently blocked.
/// Checklist booleans arrive as query parameters so the UI can re-check
/// as the editor ticks boxes.
pub async fn publish_check(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    query: web::Query<PublishChecklist>,
) -> Result<HttpResponse, AppError> {
    current_user(&session)?;
    let readiness = story::publish_readiness(&pool, path.into_inner(), &query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(readiness))
}
