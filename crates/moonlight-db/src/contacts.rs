//! Database operations for the `contacts` table (public contact form
//! messages and their back-office status).

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `contacts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContactRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values for a new contact message.
#[derive(Debug, Clone)]
pub struct NewContact<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub subject: &'a str,
    pub message: &'a str,
}

const CONTACT_COLUMNS: &str =
    "id, name, email, phone, subject, message, status, created_at, updated_at";

/// Returns all contact messages, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_contacts(pool: &PgPool) -> Result<Vec<ContactRow>, DbError> {
    let rows = sqlx::query_as::<_, ContactRow>(&format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Inserts a contact message with status `New` and returns the row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_contact(pool: &PgPool, contact: &NewContact<'_>) -> Result<ContactRow, DbError> {
    let row = sqlx::query_as::<_, ContactRow>(&format!(
        "INSERT INTO contacts (name, email, phone, subject, message) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {CONTACT_COLUMNS}"
    ))
    .bind(contact.name)
    .bind(contact.email)
    .bind(contact.phone)
    .bind(contact.subject)
    .bind(contact.message)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Sets a contact message's status. Returns the updated row, or `None` if
/// the id does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn update_contact_status(
    pool: &PgPool,
    id: i64,
    status: &str,
) -> Result<Option<ContactRow>, DbError> {
    let row = sqlx::query_as::<_, ContactRow>(&format!(
        "UPDATE contacts \
         SET status = $2, updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {CONTACT_COLUMNS}"
    ))
    .bind(id)
    .bind(status)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
