//! Bulletin transition executor and transactional rundown reorder.

use std::collections::HashSet;

use sqlx::PgPool;

use super::queries::{BULLETIN_COLUMNS, BulletinRow, find_by_id_for_update};
use super::types::*;
use crate::audit;
use crate::auth::session::CurrentUser;
use crate::errors::AppError;
use crate::workflow::transitions::find_bulletin_edge;
use crate::workflow::{BulletinStatus, GateContext, gate_allows};

/// Execute a requested status change for a bulletin.
pub async fn transition(
    pool: &PgPool,
    bulletin_id: i64,
    form: &BulletinStatusForm,
    actor: &CurrentUser,
) -> Result<Bulletin, AppError> {
    let mut tx = pool.begin().await?;

    let bulletin = find_by_id_for_update(&mut tx, bulletin_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(expected) = form.expected_version {
        if expected != bulletin.version {
            return Err(AppError::Conflict(format!(
                "Bulletin version is {}, request expected {expected}",
                bulletin.version
            )));
        }
    }

    let edge = find_bulletin_edge(bulletin.status, form.status).ok_or_else(|| {
        AppError::InvalidTransition(format!(
            "No transition from {} to {}",
            bulletin.status, form.status
        ))
    })?;

    let gate_ctx = GateContext {
        actor_id: actor.id,
        actor_role: actor.role,
        author_id: Some(bulletin.author_id),
        reviewer_id: bulletin.reviewer_id,
        assigned_to_id: None,
    };
    if !gate_allows(edge.gate, &gate_ctx) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not move this bulletin from {} to {}",
            actor.role, bulletin.status, form.status
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

    if let Some(user_id) = form.reviewer_id {
        if !crate::models::user::exists(&mut *tx, user_id).await? {
            return Err(AppError::Validation(format!(
                "reviewer_id {user_id} does not match a staff account"
            )));
        }
    }

    // An empty bulletin cannot go on air.
    if form.status == BulletinStatus::Published {
        let slots: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bulletin_stories WHERE bulletin_id = $1",
        )
        .bind(bulletin_id)
        .fetch_one(&mut *tx)
        .await?;
        if slots == 0 {
            return Err(AppError::InvalidTransition(
                "Publish blocked: bulletin has no stories in its rundown".to_string(),
            ));
        }
    }

    let entering_revision = form.status == BulletinStatus::NeedsRevision;
    let leaving_revision = bulletin.status == BulletinStatus::NeedsRevision;
    let rejection_reason = if entering_revision {
        reason.map(String::from)
    } else if leaving_revision {
        None
    } else {
        bulletin.rejection_reason.clone()
    };

    let published_at = if form.status == BulletinStatus::Published {
        Some(chrono::Utc::now())
    } else {
        bulletin.published_at
    };

    let reviewer_id = form.reviewer_id.or(bulletin.reviewer_id);

    let updated = sqlx::query_as::<_, BulletinRow>(&format!(
        "UPDATE bulletins SET status = $2, reviewer_id = $3, rejection_reason = $4, \
             published_at = $5, version = version + 1, updated_at = NOW() \
         WHERE id = $1 AND version = $6 \
         RETURNING {BULLETIN_COLUMNS}"
    ))
    .bind(bulletin_id)
    .bind(form.status.as_str())
    .bind(reviewer_id)
    .bind(rejection_reason.as_deref())
    .bind(published_at)
    .bind(bulletin.version)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| {
        AppError::Conflict("Bulletin was modified by someone else; reload and retry".to_string())
    })?
    .into_bulletin()?;

    let details = serde_json::json!({
        "from": bulletin.status.as_str(),
        "to": form.status.as_str(),
        "reviewer_id": reviewer_id,
        "rejection_reason": rejection_reason,
    });
    audit::log_tx(
        &mut tx,
        actor.id,
        "bulletin.status_changed",
        "bulletin",
        bulletin_id,
        details,
    )
    .await?;

    tx.commit().await?;
    Ok(updated)
}

/// Replace the rundown order in one transaction.
///
/// The request must cover exactly the bulletin's current member stories,
/// with positions forming 1..=n. Anything else is rejected before any
/// write happens.
pub async fn reorder(
    pool: &PgPool,
    bulletin_id: i64,
    slots: &[RundownSlotForm],
    actor: &CurrentUser,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    // Lock the bulletin row so concurrent reorders serialize.
    find_by_id_for_update(&mut tx, bulletin_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let member_ids: Vec<i64> =
        sqlx::query_scalar("SELECT story_id FROM bulletin_stories WHERE bulletin_id = $1")
            .bind(bulletin_id)
            .fetch_all(&mut *tx)
            .await?;
    let members: HashSet<i64> = member_ids.iter().copied().collect();

    if slots.len() != members.len() {
        return Err(AppError::Validation(format!(
            "Reorder must cover all {} stories in the bulletin",
            members.len()
        )));
    }

    let mut seen_stories = HashSet::new();
    let mut seen_positions = HashSet::new();
    for slot in slots {
        if !members.contains(&slot.story_id) {
            return Err(AppError::Validation(format!(
                "Story {} is not part of this bulletin",
                slot.story_id
            )));
        }
        if !seen_stories.insert(slot.story_id) {
            return Err(AppError::Validation(format!(
                "Story {} appears more than once",
                slot.story_id
            )));
        }
        if slot.position < 1 || slot.position as usize > slots.len() {
            return Err(AppError::Validation(format!(
                "Position {} is out of range 1..={}",
                slot.position,
                slots.len()
            )));
        }
        if !seen_positions.insert(slot.position) {
            return Err(AppError::Validation(format!(
                "Position {} appears more than once",
                slot.position
            )));
        }
    }

    // Shift out of the way first so the unique (bulletin_id, position)
    // index never sees a duplicate mid-update.
    sqlx::query("UPDATE bulletin_stories SET position = -position WHERE bulletin_id = $1")
        .bind(bulletin_id)
        .execute(&mut *tx)
        .await?;
    for slot in slots {
        sqlx::query(
            "UPDATE bulletin_stories SET position = $3 \
             WHERE bulletin_id = $1 AND story_id = $2",
        )
        .bind(bulletin_id)
        .bind(slot.story_id)
        .bind(slot.position)
        .execute(&mut *tx)
        .await?;
    }

    let order: Vec<i64> = {
        let mut sorted = slots.to_vec();
        sorted.sort_by_key(|s| s.position);
        sorted.iter().map(|s| s.story_id).collect()
    };
    audit::log_tx(
        &mut tx,
        actor.id,
        "bulletin.rundown_reordered",
        "bulletin",
        bulletin_id,
        serde_json::json!({ "order": order }),
    )
    .await?;

    tx.commit().await?;
    Ok(())
}
