use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::story::slug_from_title;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub name: String,
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<Category>, AppError> {
    let rows = sqlx::query_as::<_, Category>("SELECT id, name, slug FROM categories ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Category>, AppError> {
    let row = sqlx::query_as::<_, Category>("SELECT id, name, slug FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &PgPool, form: &CategoryForm) -> Result<Category, AppError> {
    let slug = slug_from_title(&form.name);
    let result = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name, slug) VALUES ($1, $2) RETURNING id, name, slug",
    )
    .bind(form.name.trim())
    .bind(&slug)
    .fetch_one(pool)
    .await;

    match result {
        Ok(cat) => Ok(cat),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict(
            format!("A category with slug '{slug}' already exists"),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn update(pool: &PgPool, id: i64, form: &CategoryForm) -> Result<Category, AppError> {
    let slug = slug_from_title(&form.name);
    let result = sqlx::query_as::<_, Category>(
        "UPDATE categories SET name = $2, slug = $3 WHERE id = $1 RETURNING id, name, slug",
    )
    .bind(id)
    .bind(form.name.trim())
    .bind(&slug)
    .fetch_optional(pool)
    .await;

    match result {
        Ok(Some(cat)) => Ok(cat),
        Ok(None) => Err(AppError::NotFound),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict(
            format!("A category with slug '{slug}' already exists"),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Delete a category. Categories still referenced by stories cannot go.
pub async fn delete(pool: &PgPool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await;

    match result {
        Ok(done) if done.rows_affected() == 0 => Err(AppError::NotFound),
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
            Err(AppError::Conflict(
                "Category is still used by stories and cannot be deleted".to_string(),
            ))
        }
        Err(e) => Err(e.into()),
    }
}
