use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::session::current_user;
use crate::auth::validate;
use crate::errors::AppError;
use crate::models::{story, translation};
use crate::models::translation::{TranslationForm, TranslationStatusForm};
use crate::workflow::{Action, ActionContext, can};

/// GET /api/v1/stories/{id}/translations
pub async fn list_for_story(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    current_user(&session)?;
    let story_id = path.into_inner();
    story::find_by_id(&pool, story_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let items = translation::find_all_for_story(&pool, story_id).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// POST /api/v1/stories/{id}/translations
pub async fn create(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Json<TranslationForm>,
) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    let story_id = path.into_inner();

    let ctx = ActionContext::new(actor.id, None);
    if !can(actor.role, Action::AssignTranslation, &ctx) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not assign translations",
            actor.role
        )));
    }
    if let Some(msg) = validate::validate_language(&form.target_language) {
        return Err(AppError::Validation(msg));
    }

    let parent = story::find_by_id(&pool, story_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if parent.language == form.target_language.trim() {
        return Err(AppError::Validation(
            "Target language matches the story's own language".to_string(),
        ));
    }
    if let Some(user_id) = form.assigned_to_id {
        if !crate::models::user::exists(&**pool, user_id).await? {
            return Err(AppError::Validation(format!(
                "assigned_to_id {user_id} does not match a staff account"
            )));
        }
    }

    let created = translation::create(&pool, story_id, &form).await?;

    let details = serde_json::json!({
        "target_language": created.target_language,
        "assigned_to_id": created.assigned_to_id,
    });
    if let Err(e) = crate::audit::log(
        &pool,
        actor.id,
        "translation.created",
        "translation",
        created.id,
        details,
    )
    .await
    {
        log::warn!("audit write failed for translation.created {}: {e}", created.id);
    }

    Ok(HttpResponse::Created().json(created))
}

/// POST /api/v1/translations/{id}/status
pub async fn change_status(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Json<TranslationStatusForm>,
) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    let updated = translation::transition(&pool, path.into_inner(), &form, &actor).await?;
    Ok(HttpResponse::Ok().json(updated))
}
