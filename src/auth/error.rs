// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::FailureBody;

/// Why the gate rejected a request.
///
/// The `Display` text of each variant is the `message` sent to the client.
/// Store faults during mandatory steps are folded into these variants, so
/// clients never see anything but the three fixed messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header, or one not of the form `Bearer <token>`
    #[error("Missing token")]
    MissingToken,
    /// Token failed signature, expiry or structure checks
    #[error("Invalid or expired token")]
    InvalidToken,
    /// Token is valid but its subject matches no user
    #[error("User not found")]
    UnknownUser,
}

impl AuthError {
    /// Get the error code for this error, used in logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidToken => "invalid_token",
            AuthError::UnknownUser => "unknown_user",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(FailureBody::new(self.to_string()))).into_response()
    }
}
