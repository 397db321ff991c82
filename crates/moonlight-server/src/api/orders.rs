//! Checkout and back-office order handlers.
//!
//! Checkout assembles the caller's session cart and submitted profile into
//! an order snapshot. The customer upsert, address append, and order insert
//! run in one database transaction; the session cart is cleared only after
//! that transaction commits, so a failed placement leaves the cart intact
//! for a retry.

use std::str::FromStr;

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, Utc};
use moonlight_core::catalog::OrderStatus;
use moonlight_core::Cart;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, AdminSession, ApiError, ApiResponse, AppState, CustomerSession, ResponseMeta};

// Excludes 0/O, 1/I/L to keep order ids readable over the phone.
const ORDER_ID_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
const ORDER_ID_SUFFIX_LEN: usize = 10;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct CheckoutRequest {
    pub customer: CheckoutCustomer,
}

#[derive(Debug, Deserialize)]
pub(super) struct CheckoutCustomer {
    pub name: String,
    pub email: Option<String>,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub pincode: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateOrderStatusRequest {
    pub order_id: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub(super) struct OrderData {
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
    pub items: Vec<OrderItemData>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(super) struct OrderItemData {
    pub product_id: Option<i64>,
    pub name: String,
    pub size: String,
    pub price: Decimal,
    pub quantity: i32,
}

impl From<moonlight_db::OrderWithItems> for OrderData {
    fn from(value: moonlight_db::OrderWithItems) -> Self {
        let order = value.order;
        Self {
            order_id: order.order_id,
            customer_phone: order.customer_phone,
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            address: order.address,
            city: order.city,
            state: order.state,
            pincode: order.pincode,
            subtotal: order.subtotal,
            shipping: order.shipping,
            total: order.total,
            status: order.status,
            payment_status: order.payment_status,
            items: value
                .items
                .into_iter()
                .map(|item| OrderItemData {
                    product_id: item.product_id,
                    name: item.name,
                    size: item.size,
                    price: item.price,
                    quantity: item.quantity,
                })
                .collect(),
            created_at: order.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Checkout pieces
// ---------------------------------------------------------------------------

/// Shipping is a step function: free above the threshold, a flat fee below
/// or at it.
fn shipping_fee(subtotal: Decimal, threshold: Decimal, flat_fee: Decimal) -> Decimal {
    if subtotal > threshold {
        Decimal::ZERO
    } else {
        flat_fee
    }
}

/// `ORD-` plus a random suffix. Collision-resistant by construction; the
/// unique index on `orders.order_id` backstops the astronomically unlikely
/// clash.
fn generate_order_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..ORDER_ID_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.random_range(0..ORDER_ID_ALPHABET.len());
            ORDER_ID_ALPHABET[idx] as char
        })
        .collect();
    format!("ORD-{suffix}")
}

fn require_field(req_id: &str, field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("{field} is required"),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/orders — place an order from the session cart.
pub(super) async fn create_order(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    session: CustomerSession,
    Json(body): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderData>>), ApiError> {
    let rid = &req_id.0;

    require_field(rid, "name", &body.customer.name)?;
    require_field(rid, "address", &body.customer.address)?;
    require_field(rid, "city", &body.customer.city)?;
    require_field(rid, "pincode", &body.customer.pincode)?;

    let cart = state
        .sessions
        .cart(&session.token)
        .await
        .ok_or_else(|| ApiError::new(rid, "unauthorized", "invalid or expired session"))?;
    if cart.is_empty() {
        return Err(ApiError::new(rid, "validation_error", "cart is empty"));
    }

    let subtotal = cart.total_price();
    let shipping = shipping_fee(
        subtotal,
        state.config.free_shipping_threshold,
        state.config.shipping_flat_fee,
    );
    let total = subtotal + shipping;
    let order_id = generate_order_id();

    let items: Vec<moonlight_db::NewOrderItem<'_>> = cart
        .items()
        .iter()
        .map(|item| moonlight_db::NewOrderItem {
            product_id: Some(item.product_id),
            name: &item.name,
            size: &item.size,
            price: item.price,
            quantity: i32::try_from(item.quantity).unwrap_or(i32::MAX),
        })
        .collect();

    let placed = moonlight_db::create_order(
        &state.pool,
        &moonlight_db::NewOrder {
            order_id: &order_id,
            customer_phone: &session.phone,
            customer_name: body.customer.name.trim(),
            customer_email: body.customer.email.as_deref(),
            address: body.customer.address.trim(),
            city: body.customer.city.trim(),
            state: body.customer.state.as_deref(),
            pincode: body.customer.pincode.trim(),
            subtotal,
            shipping,
            total,
        },
        &items,
    )
    .await
    .map_err(|e| {
        if e.is_unique_violation() {
            ApiError::new(rid, "conflict", "order id collision, please retry")
        } else {
            map_db_error(rid.clone(), &e)
        }
    })?;

    state.sessions.with_cart(&session.token, Cart::clear).await;

    tracing::info!(order_id = %placed.order.order_id, total = %placed.order.total, "order placed");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: OrderData::from(placed),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// GET /api/v1/orders — admin listing, newest first.
pub(super) async fn list_orders(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    _admin: AdminSession,
) -> Result<Json<ApiResponse<Vec<OrderData>>>, ApiError> {
    let orders = moonlight_db::list_orders(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: orders.into_iter().map(OrderData::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PUT /api/v1/orders — admin status update by public order id.
pub(super) async fn update_order_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    _admin: AdminSession,
    Json(body): Json<UpdateOrderStatusRequest>,
) -> Result<Json<ApiResponse<OrderData>>, ApiError> {
    let rid = &req_id.0;

    OrderStatus::from_str(&body.status).map_err(|_| {
        ApiError::new(
            rid,
            "validation_error",
            format!("unknown order status '{}'", body.status),
        )
    })?;

    let updated = moonlight_db::update_order_status(&state.pool, &body.order_id, &body.status)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| ApiError::new(rid, "not_found", "order not found"))?;

    // Re-read with items so the admin view stays uniform.
    let full = moonlight_db::get_order_by_order_id(&state.pool, &updated.order_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| ApiError::new(rid, "not_found", "order not found"))?;

    Ok(Json(ApiResponse {
        data: OrderData::from(full),
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn shipping_is_free_above_the_threshold() {
        assert_eq!(shipping_fee(dec(4500), dec(2999), dec(199)), Decimal::ZERO);
        assert_eq!(shipping_fee(dec(3000), dec(2999), dec(199)), Decimal::ZERO);
    }

    #[test]
    fn shipping_charges_the_flat_fee_at_or_below_the_threshold() {
        assert_eq!(shipping_fee(dec(1500), dec(2999), dec(199)), dec(199));
        // Exactly at the threshold still pays shipping: the rule is strictly
        // "exceeds".
        assert_eq!(shipping_fee(dec(2999), dec(2999), dec(199)), dec(199));
    }

    #[test]
    fn total_is_subtotal_plus_shipping() {
        let subtotal = dec(1500);
        let shipping = shipping_fee(subtotal, dec(2999), dec(199));
        assert_eq!(subtotal + shipping, dec(1699));
    }

    #[test]
    fn order_ids_carry_the_prefix_and_alphabet() {
        let id = generate_order_id();
        assert!(id.starts_with("ORD-"));
        let suffix = &id["ORD-".len()..];
        assert_eq!(suffix.len(), ORDER_ID_SUFFIX_LEN);
        for byte in suffix.bytes() {
            assert!(
                ORDER_ID_ALPHABET.contains(&byte),
                "unexpected character {} in {id}",
                byte as char
            );
        }
    }

    #[test]
    fn order_ids_do_not_repeat_in_practice() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(generate_order_id()), "order id repeated");
        }
    }
}
