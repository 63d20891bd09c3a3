use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::session::current_user;
use crate::errors::AppError;
use crate::models::{audit, bulletin, story, user};
use crate::workflow::{BulletinStatus, StoryStatus};

/// GET /api/v1/dashboard — status counts and recent activity.
pub async fn index(pool: web::Data<PgPool>, session: Session) -> Result<HttpResponse, AppError> {
    let actor = current_user(&session)?;

    let story_counts = serde_json::json!({
        "draft": story::count_by_status(&pool, StoryStatus::Draft).await,
        "in_review": story::count_by_status(&pool, StoryStatus::InReview).await,
        "needs_revision": story::count_by_status(&pool, StoryStatus::NeedsRevision).await,
        "pending_approval": story::count_by_status(&pool, StoryStatus::PendingApproval).await,
        "approved": story::count_by_status(&pool, StoryStatus::Approved).await,
        "published": story::count_by_status(&pool, StoryStatus::Published).await,
    });
    let bulletin_counts = serde_json::json!({
        "draft": bulletin::count_by_status(&pool, BulletinStatus::Draft).await,
        "in_review": bulletin::count_by_status(&pool, BulletinStatus::InReview).await,
        "approved": bulletin::count_by_status(&pool, BulletinStatus::Approved).await,
        "published": bulletin::count_by_status(&pool, BulletinStatus::Published).await,
    });

    // Recent activity is an audit read, so it follows the audit gate.
    let recent_activity = if actor.role.is_editor_tier() {
        audit::find_recent(&pool, 10).await?
    } else {
        Vec::new()
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "stories": story_counts,
        "bulletins": bulletin_counts,
        "staff_count": user::count(&pool).await?,
        "recent_activity": recent_activity,
    })))
}
