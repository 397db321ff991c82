//! Database operations for the `offers` table.
//!
//! `used_count`, `max_uses`, and `min_order_amount` are stored and served
//! but nothing consumes them at checkout; offer codes are marketing copy
//! until a redemption flow exists.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `offers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OfferRow {
    pub id: i64,
    pub title: String,
    pub code: String,
    pub kind: String,
    pub discount: Decimal,
    pub valid_until: DateTime<Utc>,
    pub status: String,
    pub used_count: i32,
    pub max_uses: Option<i32>,
    pub min_order_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values for a new offer.
#[derive(Debug, Clone)]
pub struct NewOffer<'a> {
    pub title: &'a str,
    pub code: &'a str,
    pub kind: &'a str,
    pub discount: Decimal,
    pub valid_until: DateTime<Utc>,
    pub max_uses: Option<i32>,
    pub min_order_amount: Decimal,
}

const OFFER_COLUMNS: &str = "id, title, code, kind, discount, valid_until, status, used_count, \
     max_uses, min_order_amount, created_at, updated_at";

/// Returns all offers, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_offers(pool: &PgPool) -> Result<Vec<OfferRow>, DbError> {
    let rows = sqlx::query_as::<_, OfferRow>(&format!(
        "SELECT {OFFER_COLUMNS} FROM offers ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Inserts an offer and returns the row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, including a unique
/// violation on `offers.code`.
pub async fn insert_offer(pool: &PgPool, offer: &NewOffer<'_>) -> Result<OfferRow, DbError> {
    let row = sqlx::query_as::<_, OfferRow>(&format!(
        "INSERT INTO offers (title, code, kind, discount, valid_until, max_uses, min_order_amount) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {OFFER_COLUMNS}"
    ))
    .bind(offer.title)
    .bind(offer.code)
    .bind(offer.kind)
    .bind(offer.discount)
    .bind(offer.valid_until)
    .bind(offer.max_uses)
    .bind(offer.min_order_amount)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Marks Active offers whose validity deadline has passed as Expired.
/// Returns the number of offers transitioned.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn expire_overdue_offers(pool: &PgPool) -> Result<u64, DbError> {
    let result = sqlx::query(
        "UPDATE offers \
         SET status = 'Expired', updated_at = NOW() \
         WHERE status = 'Active' AND valid_until < NOW()",
    )
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
