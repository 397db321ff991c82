//! Database operations for the `reviews` table and the product rating
//! aggregate they feed.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `reviews` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub product_id: i64,
    pub customer_phone: String,
    pub customer_name: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values for a new review. Status defaults to `Approved`.
#[derive(Debug, Clone)]
pub struct NewReview<'a> {
    pub product_id: i64,
    pub customer_phone: &'a str,
    pub customer_name: &'a str,
    pub rating: i32,
    pub comment: Option<&'a str>,
}

const REVIEW_COLUMNS: &str = "id, product_id, customer_phone, customer_name, rating, comment, \
     status, created_at, updated_at";

/// Returns a product's Approved reviews, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_approved_reviews(
    pool: &PgPool,
    product_id: i64,
) -> Result<Vec<ReviewRow>, DbError> {
    let rows = sqlx::query_as::<_, ReviewRow>(&format!(
        "SELECT {REVIEW_COLUMNS} \
         FROM reviews \
         WHERE product_id = $1 AND status = 'Approved' \
         ORDER BY created_at DESC"
    ))
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Inserts a review and recomputes the product's aggregate rating, all in
/// one transaction.
///
/// The unique index on `(product_id, customer_phone)` rejects a second
/// review from the same customer; because the whole operation is
/// transactional, a rejected insert leaves the product aggregate untouched.
/// The aggregate is a full recomputation over Approved reviews — mean
/// rounded to one decimal, plus the review count — written back onto the
/// product row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; a duplicate review
/// surfaces as a unique violation (check [`DbError::is_unique_violation`]).
pub async fn insert_review_and_refresh_rating(
    pool: &PgPool,
    review: &NewReview<'_>,
) -> Result<ReviewRow, DbError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, ReviewRow>(&format!(
        "INSERT INTO reviews (product_id, customer_phone, customer_name, rating, comment) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {REVIEW_COLUMNS}"
    ))
    .bind(review.product_id)
    .bind(review.customer_phone)
    .bind(review.customer_name)
    .bind(review.rating)
    .bind(review.comment)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "UPDATE products p \
         SET rating = agg.avg_rating, \
             review_count = agg.review_count, \
             updated_at = NOW() \
         FROM ( \
             SELECT COALESCE(ROUND(AVG(rating)::numeric, 1), 0) AS avg_rating, \
                    COUNT(*)::int AS review_count \
             FROM reviews \
             WHERE product_id = $1 AND status = 'Approved' \
         ) agg \
         WHERE p.id = $1",
    )
    .bind(review.product_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(row)
}
