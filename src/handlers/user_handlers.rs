use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::password;
use crate::auth::session::{CurrentUser, current_user};
use crate::auth::validate;
use crate::errors::AppError;
use crate::models::user::{self, NewStaffUser, StaffUserForm, StaffUserUpdateForm};
use crate::workflow::{Action, ActionContext, can};

fn require_staff_admin(actor: &CurrentUser) -> Result<(), AppError> {
    let ctx = ActionContext::new(actor.id, None);
    if !can(actor.role, Action::ManageStaff, &ctx) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not manage staff accounts",
            actor.role
        )));
    }
    Ok(())
}

/// GET /api/v1/users
pub async fn list(pool: web::Data<PgPool>, session: Session) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    require_staff_admin(&actor)?;
    let users = user::find_all(&pool).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// POST /api/v1/users
pub async fn create(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Json<StaffUserForm>,
) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    require_staff_admin(&actor)?;

    for check in [
        validate::validate_username(&form.username),
        validate::validate_email(&form.email),
        validate::validate_password(&form.password),
        validate::validate_required(&form.display_name, "Display name", 100),
    ] {
        if let Some(msg) = check {
            return Err(AppError::Validation(msg));
        }
    }

    let hashed = password::hash_password(&form.password)
        .map_err(|_| AppError::Hash("Password hash error".to_string()))?;

    let new = NewStaffUser {
        username: form.username.trim().to_string(),
        password_hash: hashed,
        email: form.email.trim().to_string(),
        display_name: form.display_name.trim().to_string(),
        role: form.staff_role,
    };
    let user_id = user::create(&pool, &new).await?;

    let details = serde_json::json!({
        "username": new.username,
        "staff_role": new.role.as_str(),
    });
    if let Err(e) = crate::audit::log(&pool, actor.id, "user.created", "user", user_id, details).await {
        log::warn!("audit write failed for user.created {user_id}: {e}");
    }

    let display = user::find_display_by_id(&pool, user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(display))
}

/// GET /api/v1/users/{id}
pub async fn read(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    require_staff_admin(&actor)?;
    let display = user::find_display_by_id(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(display))
}

/// PUT /api/v1/users/{id}
pub async fn update(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Json<StaffUserUpdateForm>,
) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    require_staff_admin(&actor)?;
    let user_id = path.into_inner();

    if let Some(email) = form.email.as_deref() {
        if let Some(msg) = validate::validate_email(email) {
            return Err(AppError::Validation(msg));
        }
    }
    if let Some(name) = form.display_name.as_deref() {
        if let Some(msg) = validate::validate_required(name, "Display name", 100) {
            return Err(AppError::Validation(msg));
        }
    }
    if let Some(pw) = form.password.as_deref() {
        if let Some(msg) = validate::validate_password(pw) {
            return Err(AppError::Validation(msg));
        }
    }
    // Nobody demotes themselves; another admin has to do it.
    if form.staff_role.is_some() && user_id == actor.id {
        return Err(AppError::Validation(
            "You cannot change your own role".to_string(),
        ));
    }

    let hashed = match form.password.as_deref() {
        Some(pw) => Some(
            password::hash_password(pw)
                .map_err(|_| AppError::Hash("Password hash error".to_string()))?,
        ),
        None => None,
    };

    user::update(
        &pool,
        user_id,
        form.email.as_deref(),
        form.display_name.as_deref(),
        form.staff_role,
        hashed.as_deref(),
    )
    .await?;

    let details = serde_json::json!({
        "staff_role": form.staff_role.map(|r| r.as_str()),
        "password_changed": form.password.is_some(),
    });
    if let Err(e) = crate::audit::log(&pool, actor.id, "user.updated", "user", user_id, details).await {
        log::warn!("audit write failed for user.updated {user_id}: {e}");
    }

    let display = user::find_display_by_id(&pool, user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(display))
}

/// DELETE /api/v1/users/{id}
pub async fn delete(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    require_staff_admin(&actor)?;
    let user_id = path.into_inner();

    if user_id == actor.id {
        return Err(AppError::Validation(
            "You cannot delete your own account".to_string(),
        ));
    }

    user::delete(&pool, user_id).await?;

    let details = serde_json::json!({});
    if let Err(e) = crate::audit::log(&pool, actor.id, "user.deleted", "user", user_id, details).await {
        log::warn!("audit write failed for user.deleted {user_id}: {e}");
    }

    Ok(HttpResponse::NoContent().finish())
}
