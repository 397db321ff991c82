//! Database operations for `customers` and their address history.
//!
//! Customers are written only by order placement (see
//! [`crate::orders::create_order`]); the functions here cover reads.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `customers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerRow {
    pub id: i64,
    pub phone: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row from the `customer_addresses` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerAddressRow {
    pub id: i64,
    pub customer_id: i64,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub pincode: String,
    pub created_at: DateTime<Utc>,
}

/// Returns a customer by phone number, or `None` if unknown.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_customer_by_phone(
    pool: &PgPool,
    phone: &str,
) -> Result<Option<CustomerRow>, DbError> {
    let row = sqlx::query_as::<_, CustomerRow>(
        "SELECT id, phone, name, email, created_at, updated_at \
         FROM customers \
         WHERE phone = $1",
    )
    .bind(phone)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns a customer's address history, oldest first. The history is
/// append-only: repeated orders with the same address produce repeated rows.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_customer_addresses(
    pool: &PgPool,
    customer_id: i64,
) -> Result<Vec<CustomerAddressRow>, DbError> {
    let rows = sqlx::query_as::<_, CustomerAddressRow>(
        "SELECT id, customer_id, address, city, state, pincode, created_at \
         FROM customer_addresses \
         WHERE customer_id = $1 \
         ORDER BY id",
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
