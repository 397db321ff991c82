//! Contact-form handlers: public submission, admin triage.

use std::str::FromStr;

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, Utc};
use moonlight_core::catalog::ContactStatus;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, AdminSession, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ContactItem {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<moonlight_db::ContactRow> for ContactItem {
    fn from(row: moonlight_db::ContactRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            subject: row.subject,
            message: row.message,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateContactRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateContactStatusRequest {
    pub id: i64,
    pub status: String,
}

/// POST /api/v1/contact — public form submission.
pub(super) async fn create_contact(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateContactRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ContactItem>>), ApiError> {
    let rid = &req_id.0;

    for (field, value) in [
        ("name", &body.name),
        ("email", &body.email),
        ("subject", &body.subject),
        ("message", &body.message),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::new(
                rid,
                "validation_error",
                format!("{field} is required"),
            ));
        }
    }
    if !body.email.contains('@') {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "email must be a valid address",
        ));
    }

    let row = moonlight_db::insert_contact(
        &state.pool,
        &moonlight_db::NewContact {
            name: body.name.trim(),
            email: body.email.trim(),
            phone: body.phone.as_deref(),
            subject: body.subject.trim(),
            message: body.message.trim(),
        },
    )
    .await
    .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: ContactItem::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// GET /api/v1/contact — admin listing, newest first.
pub(super) async fn list_contacts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    _admin: AdminSession,
) -> Result<Json<ApiResponse<Vec<ContactItem>>>, ApiError> {
    let rows = moonlight_db::list_contacts(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(ContactItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PUT /api/v1/contact — admin status update.
pub(super) async fn update_contact_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    _admin: AdminSession,
    Json(body): Json<UpdateContactStatusRequest>,
) -> Result<Json<ApiResponse<ContactItem>>, ApiError> {
    let rid = &req_id.0;

    ContactStatus::from_str(&body.status).map_err(|_| {
        ApiError::new(
            rid,
            "validation_error",
            format!("unknown contact status '{}'", body.status),
        )
    })?;

    let row = moonlight_db::update_contact_status(&state.pool, body.id, &body.status)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| ApiError::new(rid, "not_found", "contact message not found"))?;

    Ok(Json(ApiResponse {
        data: ContactItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}
