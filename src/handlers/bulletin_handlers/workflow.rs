use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::session::current_user;
use crate::errors::AppError;
use crate::models::bulletin::{self, BulletinStatusForm};

/// POST /api/v1/bulletins/{id}/status
pub async fn change_status(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Json<BulletinStatusForm>,
) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    let updated = bulletin::transition(&pool, path.into_inner(), &form, &actor).await?;
    Ok(HttpResponse::Ok().json(updated))
}
