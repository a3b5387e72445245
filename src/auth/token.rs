// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token verification.
//!
//! Tokens are HS256 JWTs signed with the shared `JWT_SECRET`. The subject
//! (`sub`) carries the user's email. Issuance happens in the login flow; this
//! module only verifies.

use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Claims carried by a vault bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject: the user's email
    pub sub: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    #[serde(default)]
    pub iat: i64,
    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Result of a successful verification. Lives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaims {
    pub subject: String,
    pub expires_at: i64,
}

/// Why a token failed verification. Only ever logged; clients see
/// [`AuthError::InvalidToken`](super::AuthError::InvalidToken).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is empty")]
    Empty,
    #[error("token has expired")]
    Expired,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token issuer is invalid")]
    InvalidIssuer,
    #[error("token is not yet valid")]
    NotYetValid,
    #[error("token is malformed: {0}")]
    Malformed(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidIssuer => TokenError::InvalidIssuer,
            ErrorKind::ImmatureSignature => TokenError::NotYetValid,
            _ => TokenError::Malformed(e.to_string()),
        }
    }
}

/// Stateless verifier over a shared HMAC secret.
///
/// Cheap to clone and safe to share across any number of concurrent
/// requests; it holds no per-call state.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Require the given `iss` claim. Tokens without one are rejected.
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.validation.set_issuer(&[issuer]);
        self.validation.required_spec_claims.insert("iss".to_string());
        self
    }

    /// Verify signature, expiry and structure, returning the subject.
    pub fn verify(&self, token: &str) -> Result<VerifiedClaims, TokenError> {
        if token.is_empty() {
            return Err(TokenError::Empty);
        }

        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(VerifiedClaims {
            subject: data.claims.sub,
            expires_at: data.claims.exp,
        })
    }

    /// `true` iff the token passes every check in [`verify`](Self::verify).
    pub fn validate(&self, token: &str) -> bool {
        self.verify(token).is_ok()
    }

    /// Subject of a token already known to be valid.
    ///
    /// Does not check the signature or expiry again. Returns `None` if the
    /// token cannot be decoded at all.
    pub fn subject_of(&self, token: &str) -> Option<String> {
        jsonwebtoken::dangerous::insecure_decode::<TokenClaims>(token)
            .ok()
            .map(|data| data.claims.sub)
    }
}
