//! Session and login handlers.
//!
//! Customers authenticate with a phone number and one-time code; the
//! back-office admin with username and password. Both paths end in a
//! server-held session addressed by an opaque bearer token — the client
//! carries no role flag of its own. Admin passwords are stored as SHA-256
//! digests and compared in constant time; a failed login never reveals
//! which of the two fields was wrong.

use axum::{extract::State, Extension, Json};
use moonlight_core::auth::sha256_hex;
use moonlight_core::Environment;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::middleware::RequestId;
use crate::session::{Identity, Role};

use super::{map_db_error, ApiError, ApiResponse, AppState, CurrentSession, ResponseMeta};

// Compared against when the username is unknown so both failure paths do
// comparable work.
const DUMMY_DIGEST: &str = "0000000000000000000000000000000000000000000000000000000000000000";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(super) struct SessionData {
    pub token: String,
    pub role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct MeData {
    pub role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OtpRequestBody {
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct OtpVerifyBody {
    pub phone: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct AdminLoginBody {
    pub username: String,
    pub password: String,
}

fn validate_phone(req_id: &str, phone: &str) -> Result<(), ApiError> {
    let trimmed = phone.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.len() < 10 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "phone must be at least 10 digits",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/session — start an anonymous session (cart-only).
pub(super) async fn create_session(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<SessionData>> {
    let token = state.sessions.create(Identity::Guest).await;

    Json(ApiResponse {
        data: SessionData {
            token,
            role: Role::Guest.as_str(),
            phone: None,
            username: None,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

/// POST /api/v1/auth/otp/request — issue a login code for a phone number.
///
/// Delivery is mocked: the SMS provider sits outside this repository. In
/// development the code is written to the log so the flow can be exercised
/// end to end.
pub(super) async fn otp_request(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<OtpRequestBody>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    validate_phone(&req_id.0, &body.phone)?;

    let phone = body.phone.trim().to_owned();
    let code = state.otp.issue(&phone).await;

    if state.config.env == Environment::Production {
        tracing::info!(%phone, "login code issued");
    } else {
        tracing::info!(%phone, %code, "login code issued (development delivery)");
    }

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "sent": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/auth/otp/verify — trade a valid code for a customer
/// session. An existing session (and its cart) is upgraded in place when
/// the caller presents its token.
pub(super) async fn otp_verify(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: axum::http::HeaderMap,
    Json(body): Json<OtpVerifyBody>,
) -> Result<Json<ApiResponse<SessionData>>, ApiError> {
    validate_phone(&req_id.0, &body.phone)?;

    let phone = body.phone.trim().to_owned();
    if !state.otp.verify(&phone, body.code.trim()).await {
        return Err(ApiError::new(
            &req_id.0,
            "unauthorized",
            "invalid or expired code",
        ));
    }

    let token = state
        .sessions
        .attach_customer(super::bearer_token(&headers), &phone)
        .await;

    Ok(Json(ApiResponse {
        data: SessionData {
            token,
            role: Role::Customer.as_str(),
            phone: Some(phone),
            username: None,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/auth/admin/login — back-office login.
pub(super) async fn admin_login(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<AdminLoginBody>,
) -> Result<Json<ApiResponse<SessionData>>, ApiError> {
    let rid = &req_id.0;
    let invalid = || ApiError::new(rid, "unauthorized", "invalid credentials");

    let admin = moonlight_db::find_admin(&state.pool, body.username.trim())
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    let submitted = sha256_hex(&body.password);
    let stored = admin
        .as_ref()
        .map_or(DUMMY_DIGEST, |row| row.password_sha256.as_str());

    let matches: bool = stored.as_bytes().ct_eq(submitted.as_bytes()).into();
    let Some(admin) = admin.filter(|_| matches) else {
        tracing::warn!(username = %body.username.trim(), "admin login rejected");
        return Err(invalid());
    };

    moonlight_db::touch_admin_login(&state.pool, admin.id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    let token = state
        .sessions
        .create(Identity::Admin {
            username: admin.username.clone(),
        })
        .await;

    tracing::info!(username = %admin.username, "admin login");

    Ok(Json(ApiResponse {
        data: SessionData {
            token,
            role: Role::Admin.as_str(),
            phone: None,
            username: Some(admin.username),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/auth/logout — destroy the caller's session.
pub(super) async fn logout(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    session: CurrentSession,
) -> Json<ApiResponse<serde_json::Value>> {
    state.sessions.destroy(&session.token).await;

    Json(ApiResponse {
        data: serde_json::json!({ "logged_out": true }),
        meta: ResponseMeta::new(req_id.0),
    })
}

/// GET /api/v1/auth/me — who the server thinks the caller is. Views gate
/// themselves on this instead of a client-held role flag.
pub(super) async fn me(
    Extension(req_id): Extension<RequestId>,
    session: CurrentSession,
) -> Json<ApiResponse<MeData>> {
    let (phone, username) = match &session.identity {
        Identity::Guest => (None, None),
        Identity::Customer { phone } => (Some(phone.clone()), None),
        Identity::Admin { username } => (None, Some(username.clone())),
    };

    Json(ApiResponse {
        data: MeData {
            role: session.identity.role().as_str(),
            phone,
            username,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_validation_accepts_plus_and_digits() {
        assert!(validate_phone("r", "+919876543210").is_ok());
        assert!(validate_phone("r", "9876543210").is_ok());
    }

    #[test]
    fn phone_validation_rejects_short_or_alphabetic() {
        assert!(validate_phone("r", "12345").is_err());
        assert!(validate_phone("r", "98765abc10").is_err());
        assert!(validate_phone("r", "").is_err());
    }
}
