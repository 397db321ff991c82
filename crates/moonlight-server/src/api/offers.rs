//! Offer handlers. The public listing feeds the storefront's marketing
//! surfaces; creation is admin-only. `max_uses` and `min_order_amount` are
//! stored and served but nothing redeems a code at checkout.

use std::str::FromStr;

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, Utc};
use moonlight_core::catalog::OfferKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, AdminSession, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct OfferItem {
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
}

impl From<moonlight_db::OfferRow> for OfferItem {
    fn from(row: moonlight_db::OfferRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            code: row.code,
            kind: row.kind,
            discount: row.discount,
            valid_until: row.valid_until,
            status: row.status,
            used_count: row.used_count,
            max_uses: row.max_uses,
            min_order_amount: row.min_order_amount,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateOfferRequest {
    pub title: String,
    pub code: String,
    pub kind: String,
    pub discount: Decimal,
    pub valid_until: DateTime<Utc>,
    pub max_uses: Option<i32>,
    #[serde(default)]
    pub min_order_amount: Decimal,
}

/// GET /api/v1/offers — public listing, newest first.
pub(super) async fn list_offers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<OfferItem>>>, ApiError> {
    let rows = moonlight_db::list_offers(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(OfferItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/offers — admin create.
pub(super) async fn create_offer(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    _admin: AdminSession,
    Json(body): Json<CreateOfferRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OfferItem>>), ApiError> {
    let rid = &req_id.0;

    let title = body.title.trim().to_owned();
    if title.is_empty() {
        return Err(ApiError::new(rid, "validation_error", "title is required"));
    }
    let code = body.code.trim().to_uppercase();
    if code.is_empty() {
        return Err(ApiError::new(rid, "validation_error", "code is required"));
    }
    OfferKind::from_str(&body.kind).map_err(|_| {
        ApiError::new(
            rid,
            "validation_error",
            format!("kind must be 'percentage' or 'fixed', got '{}'", body.kind),
        )
    })?;
    if body.discount <= Decimal::ZERO {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "discount must be positive",
        ));
    }
    if body.kind == "percentage" && body.discount > Decimal::from(100) {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "percentage discount cannot exceed 100",
        ));
    }
    if let Some(max_uses) = body.max_uses {
        if max_uses <= 0 {
            return Err(ApiError::new(
                rid,
                "validation_error",
                "max_uses must be positive",
            ));
        }
    }
    if body.min_order_amount < Decimal::ZERO {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "min_order_amount must not be negative",
        ));
    }

    let row = moonlight_db::insert_offer(
        &state.pool,
        &moonlight_db::NewOffer {
            title: &title,
            code: &code,
            kind: &body.kind,
            discount: body.discount,
            valid_until: body.valid_until,
            max_uses: body.max_uses,
            min_order_amount: body.min_order_amount,
        },
    )
    .await
    .map_err(|e| {
        if e.is_unique_violation() {
            ApiError::new(rid, "conflict", "an offer with that code already exists")
        } else {
            map_db_error(rid.clone(), &e)
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: OfferItem::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
