use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AuditEntry {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: i64,
    pub metadata: serde_json::Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct AuditEntryPage {
    pub entries: Vec<AuditEntry>,
    pub page: i64,
    pub per_page: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

const SELECT_AUDIT_DISPLAY: &str = "\
    SELECT a.id, a.user_id, \
           COALESCE(u.username, 'unknown') AS username, \
           a.action, a.entity_type, a.entity_id, a.metadata, a.created_at \
    FROM audit_log a \
    LEFT JOIN staff_users u ON a.user_id = u.id";

/// Find audit entries newest first, with pagination and optional filters.
/// `action_filter` matches by prefix (e.g. "story." covers every story
/// action); `entity_type_filter` matches exactly.
pub async fn find_paginated(
    pool: &PgPool,
    page: i64,
    per_page: i64,
    action_filter: Option<&str>,
    entity_type_filter: Option<&str>,
) -> Result<AuditEntryPage, AppError> {
    let page = page.max(1);
    let per_page = per_page.clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut filters = Vec::new();
    let mut bind_values: Vec<String> = Vec::new();

    if let Some(action) = action_filter.filter(|a| !a.is_empty() && *a != "all") {
        bind_values.push(format!("{action}%"));
        filters.push(format!("a.action LIKE ${}", bind_values.len()));
    }
    if let Some(entity) = entity_type_filter.filter(|t| !t.is_empty() && *t != "all") {
        bind_values.push(entity.to_string());
        filters.push(format!("a.entity_type = ${}", bind_values.len()));
    }

    let filter_clause = if filters.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", filters.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM audit_log a{filter_clause}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for v in &bind_values {
        count_query = count_query.bind(v);
    }
    let total_count = count_query.fetch_one(pool).await?;
    let total_pages = (total_count + per_page - 1) / per_page;

    let sql = format!(
        "{SELECT_AUDIT_DISPLAY}{filter_clause} ORDER BY a.id DESC LIMIT ${} OFFSET ${}",
        bind_values.len() + 1,
        bind_values.len() + 2
    );
    let mut query = sqlx::query_as::<_, AuditEntry>(&sql);
    for v in &bind_values {
        query = query.bind(v);
    }
    let entries = query.bind(per_page).bind(offset).fetch_all(pool).await?;

    Ok(AuditEntryPage {
        entries,
        page,
        per_page,
        total_count,
        total_pages,
    })
}

/// Fetch the N most recent audit entries (for the dashboard activity feed).
pub async fn find_recent(pool: &PgPool, limit: i64) -> Result<Vec<AuditEntry>, AppError> {
    let sql = format!("{SELECT_AUDIT_DISPLAY} ORDER BY a.id DESC LIMIT $1");
    let entries = sqlx::query_as::<_, AuditEntry>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(entries)
}

/// Full history for one entity, oldest first, for timeline rendering.
pub async fn find_for_entity(
    pool: &PgPool,
    entity_type: &str,
    entity_id: i64,
) -> Result<Vec<AuditEntry>, AppError> {
    let sql = format!(
        "{SELECT_AUDIT_DISPLAY} WHERE a.entity_type = $1 AND a.entity_id = $2 ORDER BY a.id ASC"
    );
    let entries = sqlx::query_as::<_, AuditEntry>(&sql)
        .bind(entity_type)
        .bind(entity_id)
        .fetch_all(pool)
        .await?;
    Ok(entries)
}
