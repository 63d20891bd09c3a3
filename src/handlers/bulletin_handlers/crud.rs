use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::session::current_user;
use crate::auth::validate;
use crate::errors::AppError;
use crate::models::bulletin::{self, BulletinForm, BulletinUpdateForm};
use crate::workflow::{Action, ActionContext, BulletinStatus, can};

#[derive(Debug, Default, Deserialize)]
pub struct BulletinFilter {
    pub status: Option<BulletinStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// GET /api/v1/bulletins
pub async fn list(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<BulletinFilter>,
) -> Result<HttpResponse, AppError> {
    current_user(&session)?;
    let items = bulletin::find_filtered(
        &pool,
        query.status,
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(25),
    )
    .await?;
    Ok(HttpResponse::Ok().json(items))
}

/// POST /api/v1/bulletins
pub async fn create(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Json<BulletinForm>,
) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    let ctx = ActionContext::new(actor.id, None);
    if !can(actor.role, Action::CreateBulletin, &ctx) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not create bulletins",
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

    let created = bulletin::create(&pool, &form, actor.id).await?;

    let details = serde_json::json!({ "title": created.title });
    if let Err(e) = crate::audit::log(&pool, actor.id, "bulletin.created", "bulletin", created.id, details).await {
        log::warn!("audit write failed for bulletin.created {}: {e}", created.id);
    }

    Ok(HttpResponse::Created().json(created))
}

/// GET /api/v1/bulletins/{id} — bulletin plus its rundown in order.
pub async fn read(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    current_user(&session)?;
    let bulletin_id = path.into_inner();
    let bulletin = bulletin::find_by_id(&pool, bulletin_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let rundown = bulletin::rundown(&pool, bulletin_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "bulletin": bulletin,
        "rundown": rundown,
    })))
}

/// PUT /api/v1/bulletins/{id}
pub async fn update(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Json<BulletinUpdateForm>,
) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    let bulletin_id = path.into_inner();

    let existing = bulletin::find_by_id(&pool, bulletin_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let ctx = ActionContext::new(actor.id, Some(existing.author_id));
    if !can(actor.role, Action::EditBulletin(existing.status), &ctx) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not edit this bulletin while it is {}",
            actor.role, existing.status
        )));
    }
    if let Some(title) = form.title.as_deref() {
        if let Some(msg) = validate::validate_required(title, "Title", 200) {
            return Err(AppError::Validation(msg));
        }
    }
    if let Some(expected) = form.expected_version {
        if expected != existing.version {
            return Err(AppError::Conflict(format!(
                "Bulletin version is {}, request expected {expected}",
                existing.version
            )));
        }
    }

    let updated = bulletin::update(&pool, bulletin_id, &form, existing.version).await?;

    let details = serde_json::json!({ "title": updated.title });
    if let Err(e) = crate::audit::log(&pool, actor.id, "bulletin.updated", "bulletin", bulletin_id, details).await {
        log::warn!("audit write failed for bulletin.updated {bulletin_id}: {e}");
    }

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/v1/bulletins/{id}
pub async fn delete(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    let bulletin_id = path.into_inner();

    let existing = bulletin::find_by_id(&pool, bulletin_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let ctx = ActionContext::new(actor.id, Some(existing.author_id));
    if !can(actor.role, Action::DeleteBulletin(existing.status), &ctx) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not delete this bulletin while it is {}",
            actor.role, existing.status
        )));
    }

    bulletin::delete(&pool, bulletin_id).await?;

    let details = serde_json::json!({ "title": existing.title });
    if let Err(e) = crate::audit::log(&pool, actor.id, "bulletin.deleted", "bulletin", bulletin_id, details).await {
        log::warn!("audit write failed for bulletin.deleted {bulletin_id}: {e}");
    }

    Ok(HttpResponse::NoContent().finish())
}
