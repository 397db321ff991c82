//! Cart handlers. The cart itself lives on the caller's session
//! ([`crate::session::SessionStore`]); these handlers translate HTTP verbs
//! into [`moonlight_core::Cart`] mutations and echo the resulting state.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use moonlight_core::Cart;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, CurrentSession, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct CartData {
    pub items: Vec<CartItemData>,
    pub total_items: u32,
    pub total_price: Decimal,
}

#[derive(Debug, Serialize)]
pub(super) struct CartItemData {
    pub product_id: i64,
    pub name: String,
    pub size: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl From<Cart> for CartData {
    fn from(cart: Cart) -> Self {
        Self {
            total_items: cart.total_items(),
            total_price: cart.total_price(),
            items: cart
                .items()
                .iter()
                .map(|item| CartItemData {
                    product_id: item.product_id,
                    name: item.name.clone(),
                    size: item.size.clone(),
                    price: item.price,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct AddItemRequest {
    pub product_id: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateItemRequest {
    pub quantity: i64,
}

async fn cart_response(
    state: &AppState,
    req_id: RequestId,
    token: &str,
) -> Result<Json<ApiResponse<CartData>>, ApiError> {
    let cart = state
        .sessions
        .cart(token)
        .await
        .ok_or_else(|| ApiError::new(&req_id.0, "unauthorized", "invalid or expired session"))?;

    Ok(Json(ApiResponse {
        data: CartData::from(cart),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/cart — current cart contents and totals.
pub(super) async fn get_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    session: CurrentSession,
) -> Result<Json<ApiResponse<CartData>>, ApiError> {
    cart_response(&state, req_id, &session.token).await
}

/// POST /api/v1/cart/items — add one unit of a product. The line item
/// snapshots name/size/price from the live product at add time; stock is
/// not checked.
pub(super) async fn add_item(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    session: CurrentSession,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<ApiResponse<CartData>>, ApiError> {
    let rid = &req_id.0;

    let product = moonlight_db::get_product(&state.pool, body.product_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| ApiError::new(rid, "not_found", "product not found"))?;

    state
        .sessions
        .with_cart(&session.token, |cart| {
            cart.add_item(product.id, &product.name, &product.size, product.price);
        })
        .await
        .ok_or_else(|| ApiError::new(rid, "unauthorized", "invalid or expired session"))?;

    cart_response(&state, req_id, &session.token).await
}

/// PATCH /api/v1/cart/items/:product_id — set a line's quantity; zero or
/// negative removes it.
pub(super) async fn update_item(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    session: CurrentSession,
    Path(product_id): Path<i64>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<ApiResponse<CartData>>, ApiError> {
    state
        .sessions
        .with_cart(&session.token, |cart| {
            cart.update_quantity(product_id, body.quantity);
        })
        .await
        .ok_or_else(|| ApiError::new(&req_id.0, "unauthorized", "invalid or expired session"))?;

    cart_response(&state, req_id, &session.token).await
}

/// DELETE /api/v1/cart/items/:product_id — remove a line unconditionally.
pub(super) async fn remove_item(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    session: CurrentSession,
    Path(product_id): Path<i64>,
) -> Result<Json<ApiResponse<CartData>>, ApiError> {
    state
        .sessions
        .with_cart(&session.token, |cart| cart.remove_item(product_id))
        .await
        .ok_or_else(|| ApiError::new(&req_id.0, "unauthorized", "invalid or expired session"))?;

    cart_response(&state, req_id, &session.token).await
}

/// DELETE /api/v1/cart — empty the cart.
pub(super) async fn clear_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    session: CurrentSession,
) -> Result<Json<ApiResponse<CartData>>, ApiError> {
    state
        .sessions
        .with_cart(&session.token, Cart::clear)
        .await
        .ok_or_else(|| ApiError::new(&req_id.0, "unauthorized", "invalid or expired session"))?;

    cart_response(&state, req_id, &session.token).await
}
