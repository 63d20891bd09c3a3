//! Story transition executor and publish precondition evaluation.
//!
//! All status changes funnel through [`transition`]: one transaction locks
//! the row, validates the requested edge against the static table, the
//! gate, and the companion fields, then applies the update and the audit
//! row together. A failure at any point rolls the whole thing back.

use sqlx::{PgExecutor, PgPool};

use super::queries::{STORY_COLUMNS, StoryRow, find_by_id_for_update};
use super::types::*;
use crate::audit;
use crate::auth::session::CurrentUser;
use crate::errors::AppError;
use crate::workflow::publish::{self, PublishChecklist, PublishReadiness, TranslationState};
use crate::workflow::transitions::find_story_edge;
use crate::workflow::{GateContext, ReturnStage, StoryStatus, TranslationStatus, gate_allows};

/// Execute a requested status change for a story.
pub async fn transition(
    pool: &PgPool,
    story_id: i64,
    form: &StoryStatusForm,
    actor: &CurrentUser,
) -> Result<Story, AppError> {
    let mut tx = pool.begin().await?;

    let story = find_by_id_for_update(&mut tx, story_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(expected) = form.expected_version {
        if expected != story.version {
            return Err(AppError::Conflict(format!(
                "Story version is {}, request expected {expected}",
                story.version
            )));
        }
    }

    let edge = find_story_edge(story.status, form.status).ok_or_else(|| {
        AppError::InvalidTransition(format!(
            "No transition from {} to {}",
            story.status, form.status
        ))
    })?;

    let gate_ctx = GateContext {
        actor_id: actor.id,
        actor_role: actor.role,
        author_id: Some(story.author_id),
        reviewer_id: story.reviewer_id,
        assigned_to_id: story.assigned_to_id,
    };
    if !gate_allows(edge.gate, &gate_ctx) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not move this story from {} to {}",
            actor.role, story.status, form.status
        )));
    }

    if edge.requires_reviewer && form.reviewer_id.is_none() {
        return Err(AppError::MissingRequiredField(
            "reviewer_id is required for this transition".to_string(),
        ));
    }
    let reason = form
        .rejection_reason
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if edge.requires_reason && reason.is_none() {
        return Err(AppError::MissingRequiredField(
            "rejection_reason is required for this transition".to_string(),
        ));
    }

    for (field, value) in [
        ("reviewer_id", form.reviewer_id),
        ("assigned_to_id", form.assigned_to_id),
    ] {
        if let Some(user_id) = value {
            if !crate::models::user::exists(&mut *tx, user_id).await? {
                return Err(AppError::Validation(format!(
                    "{field} {user_id} does not match a staff account"
                )));
            }
        }
    }

    // A resubmission must return to the stage that sent the story back.
    if story.status == StoryStatus::NeedsRevision {
        let stage = story.revision_returns_to.unwrap_or(ReturnStage::InReview);
        if stage.as_story_status() != form.status {
            return Err(AppError::InvalidTransition(format!(
                "Resubmission must return to {}",
                stage.as_str()
            )));
        }
    }

    if form.status == StoryStatus::Published {
        let translations = translation_states(&mut *tx, story_id).await?;
        let checklist = PublishChecklist {
            content_reviewed: form.content_reviewed,
            audio_quality_checked: form.audio_quality_checked,
        };
        let readiness = publish::evaluate(
            story.status,
            story.translations_skipped,
            &translations,
            &checklist,
        );
        if !readiness.can_publish {
            return Err(AppError::InvalidTransition(format!(
                "Publish blocked: {}",
                readiness.issues.join("; ")
            )));
        }
    }

    let entering_revision = form.status == StoryStatus::NeedsRevision;
    let leaving_revision = story.status == StoryStatus::NeedsRevision;

    // IN_REVIEW rejections return to review; approval-stage rejections
    // return to approval.
    let revision_returns_to = if entering_revision {
        Some(match story.status {
            StoryStatus::InReview => ReturnStage::InReview,
            _ => ReturnStage::PendingApproval,
        })
    } else if leaving_revision {
        None
    } else {
        story.revision_returns_to
    };

    let rejection_reason = if entering_revision {
        reason.map(String::from)
    } else if leaving_revision {
        None
    } else {
        story.rejection_reason.clone()
    };

    let published_at = if form.status == StoryStatus::Published {
        Some(chrono::Utc::now())
    } else {
        story.published_at
    };

    let reviewer_id = form.reviewer_id.or(story.reviewer_id);
    let assigned_to_id = form.assigned_to_id.or(story.assigned_to_id);

    let updated = sqlx::query_as::<_, StoryRow>(&format!(
        "UPDATE stories SET status = $2, reviewer_id = $3, assigned_to_id = $4, \
             revision_returns_to = $5, rejection_reason = $6, published_at = $7, \
             version = version + 1, updated_at = NOW() \
         WHERE id = $1 AND version = $8 \
         RETURNING {STORY_COLUMNS}"
    ))
    .bind(story_id)
    .bind(form.status.as_str())
    .bind(reviewer_id)
    .bind(assigned_to_id)
    .bind(revision_returns_to.map(|s| s.as_str()))
    .bind(rejection_reason.as_deref())
    .bind(published_at)
    .bind(story.version)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| {
        AppError::Conflict("Story was modified by someone else; reload and retry".to_string())
    })?
    .into_story()?;

    let details = serde_json::json!({
        "from": story.status.as_str(),
        "to": form.status.as_str(),
        "reviewer_id": reviewer_id,
        "rejection_reason": rejection_reason,
    });
    audit::log_tx(
        &mut tx,
        actor.id,
        "story.status_changed",
        "story",
        story_id,
        details,
    )
    .await?;

    tx.commit().await?;
    Ok(updated)
}

/// Read-only publish precondition check for the UI.
pub async fn publish_readiness(
    pool: &PgPool,
    story_id: i64,
    checklist: &PublishChecklist,
) -> Result<PublishReadiness, AppError> {
    let story = super::queries::find_by_id(pool, story_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let translations = translation_states(pool, story_id).await?;
    Ok(publish::evaluate(
        story.status,
        story.translations_skipped,
        &translations,
        checklist,
    ))
}

/// Reduce a story's translation rows to what the aggregator needs.
async fn translation_states<'e, E>(executor: E, story_id: i64) -> Result<Vec<TranslationState>, AppError>
where
    E: PgExecutor<'e>,
{
    #[derive(sqlx::FromRow)]
    struct Row {
        target_language: String,
        status: String,
    }

    let rows = sqlx::query_as::<_, Row>(
        "SELECT target_language, status FROM translations WHERE original_story_id = $1",
    )
    .bind(story_id)
    .fetch_all(executor)
    .await?;

    rows.into_iter()
        .map(|r| {
            let status = r
                .status
                .parse::<TranslationStatus>()
                .map_err(|e| AppError::decode(format!("translations.status: {e}")))?;
            Ok(TranslationState {
                target_language: r.target_language,
                status,
            })
        })
        .collect()
}
