//! Append-only audit trail writer.
//!
//! Every mutating action writes exactly one row here. Status transitions
//! write through [`log_tx`] inside the same transaction as the entity
//! update, so the mutation and its audit entry commit or roll back
//! together. Plain CRUD mutations use [`log`]; its failure must not undo
//! an already-committed mutation, so callers log-and-continue.

use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};

/// Insert an audit row inside an open transaction.
pub async fn log_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    action: &str,
    entity_type: &str,
    entity_id: i64,
    details: Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO audit_log (user_id, action, entity_type, entity_id, metadata) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(user_id)
    .bind(action)
    .bind(entity_type)
    .bind(entity_id)
    .bind(details)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Insert an audit row outside a transaction (plain CRUD mutations).
pub async fn log(
    pool: &PgPool,
    user_id: i64,
    action: &str,
    entity_type: &str,
    entity_id: i64,
    details: Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO audit_log (user_id, action, entity_type, entity_id, metadata) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(user_id)
    .bind(action)
    .bind(entity_type)
    .bind(entity_id)
    .bind(details)
    .execute(pool)
    .await?;
    Ok(())
}
