// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session endpoints.

use axum::{extract::State, http::HeaderMap, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{bearer_token, CurrentUser};
use crate::error::ApiError;
use crate::models::Session;
use crate::state::AppState;

/// Response for GET /api/sessions/current
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentSessionResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl From<Session> for CurrentSessionResponse {
    fn from(session: Session) -> Self {
        Self {
            id: session.id,
            device: session.device,
            ip: session.ip,
            created_at: session.created_at,
            last_active: session.last_active,
        }
    }
}

/// Get the session bound to the presented token.
///
/// The gate has already refreshed `last_active` for this request.
#[utoipa::path(
    get,
    path = "/api/sessions/current",
    tag = "Sessions",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current session", body = CurrentSessionResponse),
        (status = 401, description = "Missing, invalid or expired token, or unknown user", body = crate::error::FailureBody),
        (status = 404, description = "No session recorded for this token", body = crate::error::FailureBody),
        (status = 503, description = "Session store unavailable", body = crate::error::FailureBody),
    )
)]
pub async fn get_current_session(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
) -> Result<Json<CurrentSessionResponse>, ApiError> {
    let token = bearer_token(&headers).map_err(|_| ApiError::not_found("Session not found"))?;

    let session = state.gate.sessions().find_by_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Session lookup failed");
        ApiError::unavailable("Session store unavailable")
    })?;

    match session {
        Some(session) if session.user_id == user.id => Ok(Json(session.into())),
        _ => Err(ApiError::not_found("Session not found")),
    }
}
