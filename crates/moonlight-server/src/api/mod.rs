mod admin;
mod auth;
mod cart;
mod contacts;
mod offers;
mod orders;
mod products;
mod reviews;

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::cache::ResponseCache;
use crate::middleware::{request_id, RequestId};
use crate::otp::OtpStore;
use crate::session::{Identity, SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<moonlight_core::AppConfig>,
    pub sessions: SessionStore,
    pub otp: OtpStore,
    pub product_cache: ResponseCache,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "forbidden" => StatusCode::FORBIDDEN,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Clamp a requested page size into the allowed window, falling back to the
/// configured default.
pub(super) fn normalize_limit(limit: Option<i64>, default: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, 100)
}

/// Log a database failure and convert it into an opaque error payload.
/// The underlying message stays server-side.
pub(super) fn map_db_error(request_id: String, error: &moonlight_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

// ---------------------------------------------------------------------------
// Session extractors
// ---------------------------------------------------------------------------

fn request_id_of(parts: &Parts) -> String {
    parts
        .extensions
        .get::<RequestId>()
        .map_or_else(|| "unknown".to_string(), |id| id.0.clone())
}

pub(super) fn bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}

/// Any live session, regardless of role. Handlers that only need a cart
/// take this.
#[derive(Debug, Clone)]
pub(super) struct CurrentSession {
    pub token: String,
    pub identity: Identity,
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let req_id = request_id_of(parts);
        let Some(token) = bearer_token(&parts.headers) else {
            return Err(ApiError::new(req_id, "unauthorized", "session required"));
        };
        match state.sessions.identity(token).await {
            Some(identity) => Ok(Self {
                token: token.to_owned(),
                identity,
            }),
            None => Err(ApiError::new(
                req_id,
                "unauthorized",
                "invalid or expired session",
            )),
        }
    }
}

/// A session whose identity is a phone-verified customer.
#[derive(Debug, Clone)]
pub(super) struct CustomerSession {
    pub token: String,
    pub phone: String,
}

impl FromRequestParts<AppState> for CustomerSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = CurrentSession::from_request_parts(parts, state).await?;
        match session.identity {
            Identity::Customer { phone } => Ok(Self {
                token: session.token,
                phone,
            }),
            _ => Err(ApiError::new(
                request_id_of(parts),
                "forbidden",
                "phone verification required",
            )),
        }
    }
}

/// A session whose identity is the back-office admin.
#[derive(Debug, Clone)]
pub(super) struct AdminSession {
    pub username: String,
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = CurrentSession::from_request_parts(parts, state).await?;
        match session.identity {
            Identity::Admin { username } => Ok(Self { username }),
            _ => Err(ApiError::new(
                request_id_of(parts),
                "forbidden",
                "admin access required",
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route(
            "/api/v1/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/v1/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/api/v1/orders",
            get(orders::list_orders)
                .post(orders::create_order)
                .put(orders::update_order_status),
        )
        .route(
            "/api/v1/offers",
            get(offers::list_offers).post(offers::create_offer),
        )
        .route(
            "/api/v1/contact",
            get(contacts::list_contacts)
                .post(contacts::create_contact)
                .put(contacts::update_contact_status),
        )
        .route(
            "/api/v1/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/api/v1/cart",
            get(cart::get_cart).delete(cart::clear_cart),
        )
        .route("/api/v1/cart/items", post(cart::add_item))
        .route(
            "/api/v1/cart/items/{product_id}",
            axum::routing::patch(cart::update_item).delete(cart::remove_item),
        )
        .route("/api/v1/auth/session", post(auth::create_session))
        .route("/api/v1/auth/otp/request", post(auth::otp_request))
        .route("/api/v1/auth/otp/verify", post(auth::otp_verify))
        .route("/api/v1/auth/admin/login", post(auth::admin_login))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/me", get(auth::me))
        .route("/api/v1/admin/seed", post(admin::seed_database))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match moonlight_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}
