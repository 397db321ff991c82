//! Database operations for `orders` and `order_items`, including the
//! checkout write path.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row and input types
// ---------------------------------------------------------------------------

/// A row from the `orders` table. The customer columns are a snapshot taken
/// at placement time, not a live reference.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i64,
    pub order_id: String,
    pub customer_phone: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub pincode: String,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub status: String,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row from the `order_items` table. `product_id` is `None` once the
/// referenced product has been deleted; the snapshot columns stand alone.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderItemRow {
    pub id: i64,
    pub order_id: i64,
    pub product_id: Option<i64>,
    pub name: String,
    pub size: String,
    pub price: Decimal,
    pub quantity: i32,
}

/// An order joined with its line items.
#[derive(Debug, Clone)]
pub struct OrderWithItems {
    pub order: OrderRow,
    pub items: Vec<OrderItemRow>,
}

/// Customer snapshot and totals for a new order.
#[derive(Debug, Clone)]
pub struct NewOrder<'a> {
    pub order_id: &'a str,
    pub customer_phone: &'a str,
    pub customer_name: &'a str,
    pub customer_email: Option<&'a str>,
    pub address: &'a str,
    pub city: &'a str,
    pub state: Option<&'a str>,
    pub pincode: &'a str,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

/// One line-item snapshot for a new order.
#[derive(Debug, Clone)]
pub struct NewOrderItem<'a> {
    pub product_id: Option<i64>,
    pub name: &'a str,
    pub size: &'a str,
    pub price: Decimal,
    pub quantity: i32,
}

const ORDER_COLUMNS: &str = "id, order_id, customer_phone, customer_name, customer_email, \
     address, city, state, pincode, subtotal, shipping, total, status, \
     payment_status, created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Places an order: upserts the customer, appends the submitted address to
/// that customer's history, and inserts the order with its line-item
/// snapshots. All writes run inside a single transaction; if any step fails
/// nothing is applied.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any write fails, including a unique
/// violation on `orders.order_id`.
pub async fn create_order(
    pool: &PgPool,
    order: &NewOrder<'_>,
    items: &[NewOrderItem<'_>],
) -> Result<OrderWithItems, DbError> {
    let mut tx = pool.begin().await?;

    let customer_id: i64 = sqlx::query_scalar(
        "INSERT INTO customers (phone, name, email) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (phone) DO UPDATE SET \
             name = EXCLUDED.name, \
             email = EXCLUDED.email, \
             updated_at = NOW() \
         RETURNING id",
    )
    .bind(order.customer_phone)
    .bind(order.customer_name)
    .bind(order.customer_email)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO customer_addresses (customer_id, address, city, state, pincode) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(customer_id)
    .bind(order.address)
    .bind(order.city)
    .bind(order.state)
    .bind(order.pincode)
    .execute(&mut *tx)
    .await?;

    let order_row = sqlx::query_as::<_, OrderRow>(&format!(
        "INSERT INTO orders \
             (order_id, customer_phone, customer_name, customer_email, \
              address, city, state, pincode, subtotal, shipping, total) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(order.order_id)
    .bind(order.customer_phone)
    .bind(order.customer_name)
    .bind(order.customer_email)
    .bind(order.address)
    .bind(order.city)
    .bind(order.state)
    .bind(order.pincode)
    .bind(order.subtotal)
    .bind(order.shipping)
    .bind(order.total)
    .fetch_one(&mut *tx)
    .await?;

    let mut item_rows = Vec::with_capacity(items.len());
    for item in items {
        let row = sqlx::query_as::<_, OrderItemRow>(
            "INSERT INTO order_items (order_id, product_id, name, size, price, quantity) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, order_id, product_id, name, size, price, quantity",
        )
        .bind(order_row.id)
        .bind(item.product_id)
        .bind(item.name)
        .bind(item.size)
        .bind(item.price)
        .bind(item.quantity)
        .fetch_one(&mut *tx)
        .await?;
        item_rows.push(row);
    }

    tx.commit().await?;

    Ok(OrderWithItems {
        order: order_row,
        items: item_rows,
    })
}

/// Returns all orders with their items, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either query fails.
pub async fn list_orders(pool: &PgPool) -> Result<Vec<OrderWithItems>, DbError> {
    let orders = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let items = sqlx::query_as::<_, OrderItemRow>(
        "SELECT id, order_id, product_id, name, size, price, quantity \
         FROM order_items \
         WHERE order_id = ANY($1) \
         ORDER BY id",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    Ok(group_items(orders, items))
}

/// Returns one order (with items) by its public order id, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either query fails.
pub async fn get_order_by_order_id(
    pool: &PgPool,
    order_id: &str,
) -> Result<Option<OrderWithItems>, DbError> {
    let Some(order) = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1"
    ))
    .bind(order_id)
    .fetch_optional(pool)
    .await?
    else {
        return Ok(None);
    };

    let items = sqlx::query_as::<_, OrderItemRow>(
        "SELECT id, order_id, product_id, name, size, price, quantity \
         FROM order_items \
         WHERE order_id = $1 \
         ORDER BY id",
    )
    .bind(order.id)
    .fetch_all(pool)
    .await?;

    Ok(Some(OrderWithItems { order, items }))
}

/// Sets an order's fulfilment status by public order id. Any status string
/// the caller validated is accepted; there is no transition check.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn update_order_status(
    pool: &PgPool,
    order_id: &str,
    status: &str,
) -> Result<Option<OrderRow>, DbError> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "UPDATE orders \
         SET status = $2, updated_at = NOW() \
         WHERE order_id = $1 \
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(order_id)
    .bind(status)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

fn group_items(orders: Vec<OrderRow>, items: Vec<OrderItemRow>) -> Vec<OrderWithItems> {
    let mut grouped: Vec<OrderWithItems> = orders
        .into_iter()
        .map(|order| OrderWithItems {
            order,
            items: Vec::new(),
        })
        .collect();

    for item in items {
        if let Some(entry) = grouped.iter_mut().find(|o| o.order.id == item.order_id) {
            entry.items.push(item);
        }
    }

    grouped
}
