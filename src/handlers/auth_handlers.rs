use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::rate_limit::RateLimiter;
use crate::auth::session::{current_user, store_login};
use crate::auth::password;
use crate::errors::AppError;
use crate::models::user;

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// POST /api/v1/auth/login
pub async fn login(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Json<LoginForm>,
    limiter: web::Data<RateLimiter>,
) -> Result<HttpResponse, AppError> {
    // Rate-limit check BEFORE any database access.
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or_else(|| std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));

    if limiter.is_blocked(ip) {
        return Ok(HttpResponse::TooManyRequests().json(serde_json::json!({
            "error": "Too many failed login attempts. Please try again later.",
            "code": "RATE_LIMITED"
        })));
    }

    let found = user::find_by_username(&pool, &form.username).await?;

    let Some(u) = found else {
        limiter.record_failure(ip);
        return Ok(invalid_credentials());
    };

    match password::verify_password(&form.password, &u.password_hash) {
        Ok(true) => {
            limiter.clear(ip);
            session.renew();
            store_login(&session, u.id, &u.username, u.role);
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "id": u.id,
                "username": u.username,
                "display_name": u.display_name,
                "staff_role": u.role.as_str(),
            })))
        }
        _ => {
            limiter.record_failure(ip);
            Ok(invalid_credentials())
        }
    }
}

fn invalid_credentials() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({
        "error": "Invalid username or password",
        "code": "UNAUTHORIZED"
    }))
}

/// POST /api/v1/auth/logout
pub async fn logout(session: Session) -> Result<HttpResponse, AppError> {
    session.purge();
    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}

/// GET /api/v1/auth/me
pub async fn me(pool: web::Data<PgPool>, session: Session) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    let display = user::find_display_by_id(&pool, actor.id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(HttpResponse::Ok().json(display))
}
