use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::session::current_user;
use crate::errors::AppError;
use crate::models::menu_item::{self, MenuNodeForm};
use crate::workflow::{Action, ActionContext, can};

/// GET /api/v1/menu — the navigation tree for the admin UI.
pub async fn tree(pool: web::Data<PgPool>, session: Session) -> Result<HttpResponse, AppError> {
    current_user(&session)?;
    let tree = menu_item::find_tree(&pool).await?;
    Ok(HttpResponse::Ok().json(tree))
}

/// PUT /api/v1/menu — replace the whole navigation tree.
pub async fn replace(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Json<Vec<MenuNodeForm>>,
) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;
    let ctx = ActionContext::new(actor.id, None);
    if !can(actor.role, Action::ManageMenu, &ctx) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not manage the menu",
            actor.role
        )));
    }

    menu_item::replace_tree(&pool, &form).await?;

    let details = serde_json::json!({ "top_level_items": form.len() });
    if let Err(e) = crate::audit::log(&pool, actor.id, "menu.replaced", "menu", 0, details).await {
        log::warn!("audit write failed for menu.replaced: {e}");
    }

    let tree = menu_item::find_tree(&pool).await?;
    Ok(HttpResponse::Ok().json(tree))
}
