use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::session::current_user;
use crate::errors::AppError;
use crate::models::audit;
use crate::workflow::{Action, ActionContext, can};

#[derive(Debug, Default, Deserialize)]
pub struct AuditQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
}

/// GET /api/v1/audit — paginated audit trail, newest first.
pub async fn list(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<AuditQuery>,
) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    let ctx = ActionContext::new(actor.id, None);
    if !can(actor.role, Action::ViewAudit, &ctx) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not view the audit log",
            actor.role
        )));
    }

    let page = audit::find_paginated(
        &pool,
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(25),
        query.action.as_deref(),
        query.entity_type.as_deref(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/v1/audit/{entity_type}/{entity_id} — one entity's timeline,
/// oldest first.
pub async fn entity_timeline(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    let ctx = ActionContext::new(actor.id, None);
    if !can(actor.role, Action::ViewAudit, &ctx) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not view the audit log",
            actor.role
        )));
    }

    let (entity_type, entity_id) = path.into_inner();
    let entries = audit::find_for_entity(&pool, &entity_type, entity_id).await?;
    Ok(HttpResponse::Ok().json(entries))
}
