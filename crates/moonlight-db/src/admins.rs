//! Database operations for the `admins` table. Passwords are stored as
//! SHA-256 hex digests; the plaintext never reaches this layer.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `admins` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminRow {
    pub id: i64,
    pub username: String,
    pub password_sha256: String,
    pub name: String,
    pub role: String,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const ADMIN_COLUMNS: &str =
    "id, username, password_sha256, name, role, last_login_at, created_at, updated_at";

/// Returns an admin account by username, or `None` if unknown.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_admin(pool: &PgPool, username: &str) -> Result<Option<AdminRow>, DbError> {
    let row = sqlx::query_as::<_, AdminRow>(&format!(
        "SELECT {ADMIN_COLUMNS} FROM admins WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Stamps an admin's last successful login time.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn touch_admin_login(pool: &PgPool, admin_id: i64) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE admins \
         SET last_login_at = NOW(), updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(admin_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Creates or refreshes an admin account keyed by username.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_admin(
    pool: &PgPool,
    username: &str,
    password_sha256: &str,
    name: &str,
) -> Result<AdminRow, DbError> {
    let row = sqlx::query_as::<_, AdminRow>(&format!(
        "INSERT INTO admins (username, password_sha256, name) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (username) DO UPDATE SET \
             password_sha256 = EXCLUDED.password_sha256, \
             name = EXCLUDED.name, \
             updated_at = NOW() \
         RETURNING {ADMIN_COLUMNS}"
    ))
    .bind(username)
    .bind(password_sha256)
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(row)
}
