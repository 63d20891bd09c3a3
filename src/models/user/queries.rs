use sqlx::PgPool;

use super::types::*;
use crate::errors::AppError;
use crate::workflow::StaffRole;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    email: String,
    display_name: String,
    staff_role: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

fn parse_role(raw: &str) -> Result<StaffRole, AppError> {
    raw.parse::<StaffRole>()
        .map_err(|e| AppError::decode(format!("staff_users.staff_role: {e}")))
}

impl UserRow {
    fn into_user(self) -> Result<StaffUser, AppError> {
        Ok(StaffUser {
            role: parse_role(&self.staff_role)?,
            id: self.id,
            username: self.username,
            password_hash: self.password_hash,
            email: self.email,
            display_name: self.display_name,
        })
    }

    fn into_display(self) -> Result<StaffUserDisplay, AppError> {
        Ok(StaffUserDisplay {
            staff_role: parse_role(&self.staff_role)?,
            id: self.id,
            username: self.username,
            email: self.email,
            display_name: self.display_name,
            created_at: self.created_at,
        })
    }
}

const SELECT_USER: &str = "SELECT id, username, password_hash, email, display_name, staff_role, \
                           created_at FROM staff_users";

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<StaffUser>, AppError> {
    let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE username = $1"))
        .bind(username)
        .fetch_optional(pool)
        .await?;
    row.map(UserRow::into_user).transpose()
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<StaffUser>, AppError> {
    let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(UserRow::into_user).transpose()
}

pub async fn find_display_by_id(pool: &PgPool, id: i64) -> Result<Option<StaffUserDisplay>, AppError> {
    let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(UserRow::into_display).transpose()
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<StaffUserDisplay>, AppError> {
    let rows = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} ORDER BY username"))
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(UserRow::into_display).collect()
}

/// Create a staff account. A duplicate username is a `Conflict`.
pub async fn create(pool: &PgPool, new: &NewStaffUser) -> Result<i64, AppError> {
    let result = sqlx::query_scalar::<_, i64>(
        "INSERT INTO staff_users (username, password_hash, email, display_name, staff_role) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(&new.username)
    .bind(&new.password_hash)
    .bind(&new.email)
    .bind(&new.display_name)
    .bind(new.role.as_str())
    .fetch_one(pool)
    .await;

    match result {
        Ok(id) => Ok(id),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict(
            format!("Username '{}' already exists", new.username),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Apply a partial update. Absent fields keep their stored values.
pub async fn update(
    pool: &PgPool,
    id: i64,
    email: Option<&str>,
    display_name: Option<&str>,
    role: Option<StaffRole>,
    password_hash: Option<&str>,
) -> Result<(), AppError> {
    let updated = sqlx::query(
        "UPDATE staff_users SET \
             email = COALESCE($2, email), \
             display_name = COALESCE($3, display_name), \
             staff_role = COALESCE($4, staff_role), \
             password_hash = COALESCE($5, password_hash), \
             updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(email)
    .bind(display_name)
    .bind(role.map(|r| r.as_str()))
    .bind(password_hash)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// Delete a staff account. Fails with `Conflict` while the account is still
/// referenced as an author/reviewer/assignee.
pub async fn delete(pool: &PgPool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM staff_users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await;

    match result {
        Ok(done) if done.rows_affected() == 0 => Err(AppError::NotFound),
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
            Err(AppError::Conflict(
                "Staff member still owns content and cannot be deleted".to_string(),
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// Cheap existence probe for foreign-key style validation, usable inside
/// an open transaction.
pub async fn exists<'e, E>(executor: E, id: i64) -> Result<bool, AppError>
where
    E: sqlx::PgExecutor<'e>,
{
    let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM staff_users WHERE id = $1)")
        .bind(id)
        .fetch_one(executor)
        .await?;
    Ok(found)
}

pub async fn count(pool: &PgPool) -> Result<i64, AppError> {
    let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM staff_users")
        .fetch_one(pool)
        .await?;
    Ok(n)
}
