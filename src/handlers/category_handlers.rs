use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::session::current_user;
use crate::auth::validate;
use crate::errors::AppError;
use crate::models::category::{self, CategoryForm};
use crate::workflow::{Action, ActionContext, can};

/// GET /api/v1/categories
pub async fn list(pool: web::Data<PgPool>, session: Session) -> Result<HttpResponse, AppError> {
    current_user(&session)?;
    let items = category::find_all(&pool).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// POST /api/v1/categories
pub async fn create(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Json<CategoryForm>,
) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    let ctx = ActionContext::new(actor.id, None);
    if !can(actor.role, Action::ManageCategories, &ctx) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not manage categories",
            actor.role
        )));
    }
    if let Some(msg) = validate::validate_required(&form.name, "Name", 100) {
        return Err(AppError::Validation(msg));
    }

    let created = category::create(&pool, &form).await?;

    let details = serde_json::json!({ "name": created.name });
    if let Err(e) = crate::audit::log(&pool, actor.id, "category.created", "category", created.id, details).await {
        log::warn!("audit write failed for category.created {}: {e}", created.id);
    }

    Ok(HttpResponse::Created().json(created))
}

/// PUT /api/v1/categories/{id}
pub async fn update(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Json<CategoryForm>,
) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    let ctx = ActionContext::new(actor.id, None);
    if !can(actor.role, Action::ManageCategories, &ctx) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not manage categories",
            actor.role
        )));
    }
    if let Some(msg) = validate::validate_required(&form.name, "Name", 100) {
        return Err(AppError::Validation(msg));
    }

    let id = path.into_inner();
    let updated = category::update(&pool, id, &form).await?;

    let details = serde_json::json!({ "name": updated.name });
    if let Err(e) = crate::audit::log(&pool, actor.id, "category.updated", "category", id, details).await {
        log::warn!("audit write failed for category.updated {id}: {e}");
    }

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/v1/categories/{id}
pub async fn delete(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    let ctx = ActionContext::new(actor.id, None);
    if !can(actor.role, Action::ManageCategories, &ctx) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not manage categories",
            actor.role
        )));
    }

    let id = path.into_inner();
    category::delete(&pool, id).await?;

    if let Err(e) = crate::audit::log(&pool, actor.id, "category.deleted", "category", id, serde_json::json!({})).await {
        log::warn!("audit write failed for category.deleted {id}: {e}");
    }

    Ok(HttpResponse::NoContent().finish())
}
