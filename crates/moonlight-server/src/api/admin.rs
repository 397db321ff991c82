//! Operational tooling: demo-data seeding. Mirrors the CLI `seed` command
//! so a deployed instance can be initialised without shell access.

use std::collections::BTreeMap;

use axum::{extract::State, Extension, Json};
use moonlight_core::auth::sha256_hex;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, AdminSession, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct SeedData {
    pub message: &'static str,
    pub products_count: usize,
    pub categories: BTreeMap<String, usize>,
}

/// POST /api/v1/admin/seed — upsert the admin account and demo catalog.
pub(super) async fn seed_database(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    _admin: AdminSession,
) -> Result<Json<ApiResponse<SeedData>>, ApiError> {
    let rid = &req_id.0;

    let digest = sha256_hex(&state.config.admin_password);
    moonlight_db::seed_admin(&state.pool, &state.config.admin_username, &digest)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    let products_count = moonlight_db::seed_products(&state.pool)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    let mut categories: BTreeMap<String, usize> = BTreeMap::new();
    for product in moonlight_db::demo_products() {
        *categories.entry(product.category).or_default() += 1;
    }

    tracing::info!(products_count, "database seeded");

    Ok(Json(ApiResponse {
        data: SeedData {
            message: "database seeded successfully",
            products_count,
            categories,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
