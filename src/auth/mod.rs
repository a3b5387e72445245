// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer token authentication for the vault API.
//!
//! ## Auth Flow
//!
//! 1. The login flow issues an HS256 JWT whose `sub` is the user's email and
//!    records a session for it
//! 2. Clients send `Authorization: Bearer <token>`
//! 3. For every request the gate:
//!    - lets CORS pre-flight and `/api/auth/*` requests through untouched
//!    - verifies the token signature and expiry
//!    - resolves the user by email
//!    - bumps the session's `last_active` (best-effort)
//!    - attaches the user to the request, or answers 401
//!
//! ## Security
//!
//! - Every failure during a mandatory step rejects the request
//! - Rejections expose only three fixed messages
//! - Sessions are keyed by a SHA-256 digest of the token, never the token
//! - Clock skew tolerance is 60 seconds

pub mod error;
pub mod extractor;
pub mod gate;
pub mod identity;
pub mod middleware;
pub mod session;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;

pub use error::AuthError;
pub use extractor::CurrentUser;
pub use gate::{bearer_token, AuthGate, Decision};
pub use identity::{IdentityResolver, UserStore};
pub use middleware::auth_gate;
pub use session::{Clock, SessionStore, SessionTracker, SystemClock};
pub use token::{TokenClaims, TokenError, TokenVerifier, VerifiedClaims};
