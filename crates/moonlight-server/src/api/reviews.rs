//! Review handlers. Submission requires a phone-verified customer session —
//! the reviewer's phone comes from the session, never the request body — and
//! feeds the product's aggregate rating in the same transaction.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, CustomerSession, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ReviewItem {
    pub id: i64,
    pub product_id: i64,
    pub customer_name: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<moonlight_db::ReviewRow> for ReviewItem {
    fn from(row: moonlight_db::ReviewRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            customer_name: row.customer_name,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ReviewQuery {
    pub product_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateReviewRequest {
    pub product_id: i64,
    pub name: String,
    pub rating: i32,
    pub comment: Option<String>,
}

/// GET /api/v1/reviews?product_id= — a product's Approved reviews, newest
/// first.
pub(super) async fn list_reviews(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<ApiResponse<Vec<ReviewItem>>>, ApiError> {
    let Some(product_id) = query.product_id else {
        return Err(ApiError::new(
            &req_id.0,
            "validation_error",
            "product_id is required",
        ));
    };

    let rows = moonlight_db::list_approved_reviews(&state.pool, product_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(ReviewItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/reviews — submit a review and refresh the product's
/// aggregate. One review per customer per product.
pub(super) async fn create_review(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    session: CustomerSession,
    Json(body): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewItem>>), ApiError> {
    let rid = &req_id.0;

    let name = body.name.trim().to_owned();
    if name.is_empty() {
        return Err(ApiError::new(rid, "validation_error", "name is required"));
    }
    if !(1..=5).contains(&body.rating) {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "rating must be between 1 and 5",
        ));
    }

    moonlight_db::get_product(&state.pool, body.product_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| ApiError::new(rid, "not_found", "product not found"))?;

    let row = moonlight_db::insert_review_and_refresh_rating(
        &state.pool,
        &moonlight_db::NewReview {
            product_id: body.product_id,
            customer_phone: &session.phone,
            customer_name: &name,
            rating: body.rating,
            comment: body.comment.as_deref().map(str::trim),
        },
    )
    .await
    .map_err(|e| {
        if e.is_unique_violation() {
            ApiError::new(rid, "conflict", "you have already reviewed this product")
        } else {
            map_db_error(rid.clone(), &e)
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: ReviewItem::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
