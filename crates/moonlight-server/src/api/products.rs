//! Catalog handlers.
//!
//! The public listing is served through the response cache; every admin
//! write invalidates the whole cached listing family.

use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use moonlight_core::catalog::{Category, ProductStatus, SubCategory};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, AdminSession, ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) const PRODUCT_CACHE_PREFIX: &str = "products:";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(super) struct ProductItem {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub sub_category: Option<String>,
    pub size: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub stock: i32,
    pub description: Option<String>,
    pub image_url: String,
    pub notes: Vec<String>,
    pub status: String,
    pub rating: Decimal,
    pub review_count: i32,
    pub is_best_seller: bool,
    pub is_featured: bool,
    pub is_hero_carousel: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<moonlight_db::ProductRow> for ProductItem {
    fn from(row: moonlight_db::ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            category: row.category,
            sub_category: row.sub_category,
            size: row.size,
            price: row.price,
            original_price: row.original_price,
            stock: row.stock,
            description: row.description,
            image_url: row.image_url,
            notes: row.notes,
            status: row.status,
            rating: row.rating,
            review_count: row.review_count,
            is_best_seller: row.is_best_seller,
            is_featured: row.is_featured,
            is_hero_carousel: row.is_hero_carousel,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductQuery {
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub best_sellers: Option<bool>,
    pub featured: Option<bool>,
    pub hero_carousel: Option<bool>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateProductRequest {
    pub name: String,
    pub category: String,
    pub sub_category: Option<String>,
    pub size: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub stock: i32,
    pub description: Option<String>,
    pub image_url: String,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub rating: Decimal,
    #[serde(default)]
    pub review_count: i32,
    #[serde(default)]
    pub is_best_seller: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_hero_carousel: bool,
}

// Option<Option<T>> is intentional: outer None = "not in request" (keep current),
// Some(None) = "explicitly cleared", Some(Some(v)) = "set to value".
#[allow(clippy::option_option)]
#[derive(Debug, Deserialize)]
pub(super) struct UpdateProductRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<Option<String>>,
    pub size: Option<String>,
    pub price: Option<Decimal>,
    pub original_price: Option<Option<Decimal>>,
    pub stock: Option<i32>,
    pub description: Option<Option<String>>,
    pub image_url: Option<String>,
    pub notes: Option<Vec<String>>,
    pub status: Option<String>,
    pub is_best_seller: Option<bool>,
    pub is_featured: Option<bool>,
    pub is_hero_carousel: Option<bool>,
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn validate_category(req_id: &str, value: &str) -> Result<(), ApiError> {
    Category::from_str(value).map(|_| ()).map_err(|_| {
        ApiError::new(
            req_id,
            "validation_error",
            format!("unknown category '{value}'"),
        )
    })
}

fn validate_sub_category(req_id: &str, value: &str) -> Result<(), ApiError> {
    SubCategory::from_str(value).map(|_| ()).map_err(|_| {
        ApiError::new(
            req_id,
            "validation_error",
            format!("unknown sub-category '{value}'"),
        )
    })
}

fn validate_price(req_id: &str, field: &str, value: Decimal) -> Result<(), ApiError> {
    if value < Decimal::ZERO {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("{field} must not be negative"),
        ));
    }
    Ok(())
}

fn validate_rating(req_id: &str, value: Decimal) -> Result<(), ApiError> {
    if value < Decimal::ZERO || value > Decimal::from(5) {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "rating must be between 0 and 5",
        ));
    }
    Ok(())
}

/// Deterministic cache key for a listing request: identical filters map to
/// the same entry.
fn cache_key(query: &ProductQuery, limit: i64) -> String {
    format!(
        "{PRODUCT_CACHE_PREFIX}category={}&sub_category={}&best_sellers={}&featured={}&hero_carousel={}&limit={limit}",
        query.category.as_deref().unwrap_or(""),
        query.sub_category.as_deref().unwrap_or(""),
        query.best_sellers.unwrap_or(false),
        query.featured.unwrap_or(false),
        query.hero_carousel.unwrap_or(false),
    )
}

/// Map a listing flag the way the storefront does: only an explicit `true`
/// narrows the result set.
fn flag_filter(value: Option<bool>) -> Option<bool> {
    value.filter(|v| *v)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/products — public listing, Active only, newest first.
pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let rid = &req_id.0;
    if let Some(ref category) = query.category {
        validate_category(rid, category)?;
    }
    if let Some(ref sub_category) = query.sub_category {
        validate_sub_category(rid, sub_category)?;
    }

    let limit = normalize_limit(query.limit, state.config.product_page_size);
    let key = cache_key(&query, limit);

    if let Some(cached) = state.product_cache.get(&key).await {
        return Ok(Json(ApiResponse {
            data: cached,
            meta: ResponseMeta::new(req_id.0),
        }));
    }

    let rows = moonlight_db::list_products(
        &state.pool,
        moonlight_db::ProductFilters {
            category: query.category.as_deref(),
            sub_category: query.sub_category.as_deref(),
            best_sellers: flag_filter(query.best_sellers),
            featured: flag_filter(query.featured),
            hero_carousel: flag_filter(query.hero_carousel),
            limit,
        },
    )
    .await
    .map_err(|e| map_db_error(rid.clone(), &e))?;

    let items: Vec<ProductItem> = rows.into_iter().map(ProductItem::from).collect();
    let data = serde_json::to_value(items)
        .map_err(|_| ApiError::new(rid, "internal_error", "response serialization failed"))?;

    state.product_cache.set(&key, data.clone()).await;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/products/:id — detail view, any status.
pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ProductItem>>, ApiError> {
    let row = moonlight_db::get_product(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(&req_id.0, "not_found", "product not found"))?;

    Ok(Json(ApiResponse {
        data: ProductItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/products — admin create. New products always start Active.
pub(super) async fn create_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    _admin: AdminSession,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProductItem>>), ApiError> {
    let rid = &req_id.0;

    let name = body.name.trim().to_owned();
    if name.is_empty() {
        return Err(ApiError::new(rid, "validation_error", "name is required"));
    }
    validate_category(rid, &body.category)?;
    if let Some(ref sub_category) = body.sub_category {
        validate_sub_category(rid, sub_category)?;
    }
    if body.size.trim().is_empty() {
        return Err(ApiError::new(rid, "validation_error", "size is required"));
    }
    if body.image_url.trim().is_empty() {
        return Err(ApiError::new(rid, "validation_error", "image_url is required"));
    }
    validate_price(rid, "price", body.price)?;
    if let Some(original_price) = body.original_price {
        validate_price(rid, "original_price", original_price)?;
    }
    if body.stock < 0 {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "stock must not be negative",
        ));
    }
    validate_rating(rid, body.rating)?;

    let row = moonlight_db::insert_product(
        &state.pool,
        &moonlight_db::ProductInput {
            name,
            category: body.category,
            sub_category: body.sub_category,
            size: body.size,
            price: body.price,
            original_price: body.original_price,
            stock: body.stock,
            description: body.description,
            image_url: body.image_url,
            notes: body.notes,
            status: ProductStatus::Active.as_str().to_owned(),
            rating: body.rating,
            review_count: body.review_count,
            is_best_seller: body.is_best_seller,
            is_featured: body.is_featured,
            is_hero_carousel: body.is_hero_carousel,
        },
    )
    .await
    .map_err(|e| map_db_error(rid.clone(), &e))?;

    state
        .product_cache
        .invalidate_prefix(PRODUCT_CACHE_PREFIX)
        .await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: ProductItem::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PUT /api/v1/products/:id — admin sparse update (full edit and quick edit
/// share this).
pub(super) async fn update_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    _admin: AdminSession,
    Path(id): Path<i64>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<ProductItem>>, ApiError> {
    let rid = &req_id.0;

    let trimmed_name = body.name.as_ref().map(|n| n.trim().to_owned());
    if let Some(ref name) = trimmed_name {
        if name.is_empty() {
            return Err(ApiError::new(rid, "validation_error", "name is required"));
        }
    }
    if let Some(ref category) = body.category {
        validate_category(rid, category)?;
    }
    if let Some(Some(ref sub_category)) = body.sub_category {
        validate_sub_category(rid, sub_category)?;
    }
    if let Some(price) = body.price {
        validate_price(rid, "price", price)?;
    }
    if let Some(Some(original_price)) = body.original_price {
        validate_price(rid, "original_price", original_price)?;
    }
    if let Some(stock) = body.stock {
        if stock < 0 {
            return Err(ApiError::new(
                rid,
                "validation_error",
                "stock must not be negative",
            ));
        }
    }
    if let Some(ref status) = body.status {
        ProductStatus::from_str(status).map_err(|_| {
            ApiError::new(
                rid,
                "validation_error",
                format!("unknown product status '{status}'"),
            )
        })?;
    }

    let row = moonlight_db::update_product(
        &state.pool,
        id,
        &moonlight_db::ProductPatch {
            name: trimmed_name,
            category: body.category,
            sub_category: body.sub_category,
            size: body.size,
            price: body.price,
            original_price: body.original_price,
            stock: body.stock,
            description: body.description,
            image_url: body.image_url,
            notes: body.notes,
            status: body.status,
            is_best_seller: body.is_best_seller,
            is_featured: body.is_featured,
            is_hero_carousel: body.is_hero_carousel,
        },
    )
    .await
    .map_err(|e| map_db_error(rid.clone(), &e))?
    .ok_or_else(|| ApiError::new(rid, "not_found", "product not found"))?;

    state
        .product_cache
        .invalidate_prefix(PRODUCT_CACHE_PREFIX)
        .await;

    Ok(Json(ApiResponse {
        data: ProductItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/products/:id — admin hard delete.
pub(super) async fn delete_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let deleted = moonlight_db::delete_product(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if !deleted {
        return Err(ApiError::new(&req_id.0, "not_found", "product not found"));
    }

    state
        .product_cache
        .invalidate_prefix(PRODUCT_CACHE_PREFIX)
        .await;

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_query() -> ProductQuery {
        ProductQuery {
            category: None,
            sub_category: None,
            best_sellers: None,
            featured: None,
            hero_carousel: None,
            limit: None,
        }
    }

    #[test]
    fn cache_key_is_deterministic_for_identical_filters() {
        let a = ProductQuery {
            category: Some("Attar".into()),
            best_sellers: Some(true),
            ..empty_query()
        };
        let b = ProductQuery {
            category: Some("Attar".into()),
            best_sellers: Some(true),
            ..empty_query()
        };
        assert_eq!(cache_key(&a, 50), cache_key(&b, 50));
    }

    #[test]
    fn cache_key_distinguishes_every_filter() {
        let base = cache_key(&empty_query(), 50);
        let with_category = cache_key(
            &ProductQuery {
                category: Some("Oud".into()),
                ..empty_query()
            },
            50,
        );
        let with_hero = cache_key(
            &ProductQuery {
                hero_carousel: Some(true),
                ..empty_query()
            },
            50,
        );
        assert_ne!(base, with_category);
        assert_ne!(base, with_hero);
        assert_ne!(with_category, with_hero);
        assert_ne!(base, cache_key(&empty_query(), 20));
    }

    #[test]
    fn flag_filter_only_narrows_on_true() {
        assert_eq!(flag_filter(Some(true)), Some(true));
        assert_eq!(flag_filter(Some(false)), None);
        assert_eq!(flag_filter(None), None);
    }

    #[test]
    fn rating_bounds_are_enforced() {
        assert!(validate_rating("r", Decimal::new(45, 1)).is_ok());
        assert!(validate_rating("r", Decimal::from(5)).is_ok());
        assert!(validate_rating("r", Decimal::from(6)).is_err());
        assert!(validate_rating("r", Decimal::from(-1)).is_err());
    }
}
