// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The per-request authentication decision.
//!
//! ```text
//! START ──pre-flight / public path──▶ ALLOWED_UNCHECKED
//!   │
//!   └──▶ CHECKING ──header──▶ verify ──▶ resolve user ──▶ touch session ──▶ AUTHENTICATED
//!            │                  │              │
//!            └──────────────────┴──────────────┴──────────▶ REJECTED
//! ```
//!
//! The first failing step decides the rejection reason. Session refresh runs
//! only after the user is resolved and can never cause a rejection.

use axum::http::{header::AUTHORIZATION, HeaderMap, Method};

use super::{AuthError, IdentityResolver, SessionTracker, TokenVerifier};
use crate::config::GateConfig;
use crate::models::User;

const BEARER_PREFIX: &str = "Bearer ";

/// Outcome of running the gate on one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Pre-flight or public path; no token was looked at.
    AllowUnchecked,
    /// Token verified and the user exists.
    Authenticated(User),
    Rejected(AuthError),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Decision::Rejected(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Decision::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Extract the bearer token from the `Authorization` header.
///
/// The scheme is case-sensitive and must be followed by exactly one space;
/// the remainder is trimmed. A header without the scheme counts as missing.
/// A token after the scheme that is not UTF-8 is invalid.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let raw = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.as_bytes().strip_prefix(BEARER_PREFIX.as_bytes()))
        .ok_or(AuthError::MissingToken)?;

    std::str::from_utf8(raw)
        .map(str::trim)
        .map_err(|_| AuthError::InvalidToken)
}

/// Composes verifier, resolver and tracker into a pass/reject decision.
#[derive(Clone)]
pub struct AuthGate {
    config: GateConfig,
    verifier: TokenVerifier,
    identity: IdentityResolver,
    sessions: SessionTracker,
}

impl AuthGate {
    pub fn new(
        config: GateConfig,
        verifier: TokenVerifier,
        identity: IdentityResolver,
        sessions: SessionTracker,
    ) -> Self {
        Self {
            config,
            verifier,
            identity,
            sessions,
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn identity(&self) -> &IdentityResolver {
        &self.identity
    }

    pub fn sessions(&self) -> &SessionTracker {
        &self.sessions
    }

    /// Whether the request bypasses token checks entirely.
    pub fn is_exempt(&self, method: &Method, path: &str) -> bool {
        method
            .as_str()
            .eq_ignore_ascii_case(self.config.preflight_method.as_str())
            || path.starts_with(&self.config.public_prefix)
    }

    pub fn decide(&self, method: &Method, path: &str, headers: &HeaderMap) -> Decision {
        if self.is_exempt(method, path) {
            return Decision::AllowUnchecked;
        }

        match self.authenticate(headers) {
            Ok(user) => Decision::Authenticated(user),
            Err(e) => {
                tracing::debug!(%method, path, reason = e.error_code(), "Request rejected");
                Decision::Rejected(e)
            }
        }
    }

    /// Run the mandatory checks plus the best-effort session refresh.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<User, AuthError> {
        let token = bearer_token(headers)?;

        let claims = self.verifier.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Token verification failed");
            AuthError::InvalidToken
        })?;

        let user = match self.identity.find_by_email(&claims.subject) {
            Ok(Some(user)) => user,
            Ok(None) => return Err(AuthError::UnknownUser),
            Err(e) => {
                // Fail closed: a store fault must not let the request through.
                tracing::error!(error = %e, "User lookup failed");
                return Err(AuthError::UnknownUser);
            }
        };

        self.sessions.touch(token);

        Ok(user)
    }
}
