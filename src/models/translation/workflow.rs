//! Translation transition executor.
//!
//! Same shape as the story executor: one transaction, row lock, edge and
//! gate validation, companion fields, version bump, audit row.

use sqlx::PgPool;

use super::queries::{TRANSLATION_COLUMNS, TranslationRow, find_by_id_for_update};
use super::types::*;
use crate::audit;
use crate::auth::session::CurrentUser;
use crate::errors::AppError;
use crate::workflow::transitions::find_translation_edge;
use crate::workflow::{GateContext, TranslationStatus, gate_allows};

/// Execute a requested status change for a translation.
pub async fn transition(
    pool: &PgPool,
    translation_id: i64,
    form: &TranslationStatusForm,
    actor: &CurrentUser,
) -> Result<Translation, AppError> {
    let mut tx = pool.begin().await?;

    let translation = find_by_id_for_update(&mut tx, translation_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(expected) = form.expected_version {
        if expected != translation.version {
            return Err(AppError::Conflict(format!(
                "Translation version is {}, request expected {expected}",
                translation.version
            )));
        }
    }

    let edge = find_translation_edge(translation.status, form.status).ok_or_else(|| {
        AppError::InvalidTransition(format!(
            "No transition from {} to {}",
            translation.status, form.status
        ))
    })?;

    let gate_ctx = GateContext {
        actor_id: actor.id,
        actor_role: actor.role,
        author_id: None,
        reviewer_id: None,
        assigned_to_id: translation.assigned_to_id,
    };
    if !gate_allows(edge.gate, &gate_ctx) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not move this translation from {} to {}",
            actor.role, translation.status, form.status
        )));
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

    // Submitting for review requires the translated story to exist.
    let translated_story_id = form.translated_story_id.or(translation.translated_story_id);
    if edge.requires_translated_story && translated_story_id.is_none() {
        return Err(AppError::MissingRequiredField(
            "translated_story_id is required when submitting for review".to_string(),
        ));
    }
    if let Some(story_id) = form.translated_story_id {
        let found: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM stories WHERE id = $1)")
                .bind(story_id)
                .fetch_one(&mut *tx)
                .await?;
        if !found {
            return Err(AppError::Validation(format!(
                "translated_story_id {story_id} does not match a story"
            )));
        }
    }

    let entering_rejected = form.status == TranslationStatus::Rejected;
    let leaving_rejected = translation.status == TranslationStatus::Rejected;
    let rejection_reason = if entering_rejected {
        reason.map(String::from)
    } else if leaving_rejected {
        None
    } else {
        translation.rejection_reason.clone()
    };

    let updated = sqlx::query_as::<_, TranslationRow>(&format!(
        "UPDATE translations SET status = $2, translated_story_id = $3, \
             rejection_reason = $4, version = version + 1, updated_at = NOW() \
         WHERE id = $1 AND version = $5 \
         RETURNING {TRANSLATION_COLUMNS}"
    ))
    .bind(translation_id)
    .bind(form.status.as_str())
    .bind(translated_story_id)
    .bind(rejection_reason.as_deref())
    .bind(translation.version)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| {
        AppError::Conflict("Translation was modified by someone else; reload and retry".to_string())
    })?
    .into_translation()?;

    let details = serde_json::json!({
        "from": translation.status.as_str(),
        "to": form.status.as_str(),
        "target_language": translation.target_language,
        "rejection_reason": rejection_reason,
    });
    audit::log_tx(
        &mut tx,
        actor.id,
        "translation.status_changed",
        "translation",
        translation_id,
        details,
    )
    .await?;

    tx.commit().await?;
    Ok(updated)
}
