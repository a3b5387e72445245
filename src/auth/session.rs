// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session activity tracking.
//!
//! Every authenticated request bumps the `last_active` timestamp of the
//! session its token belongs to. This bookkeeping is best-effort: a missing
//! session or a failing store never turns an authenticated request into a
//! rejected one.

use std::sync::Arc;

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::models::Session;
use crate::storage::StoreResult;

/// Read/write access to session records, owned by the surrounding application.
pub trait SessionStore: Send + Sync {
    /// Look up a session by its token key. A miss is `Ok(None)`.
    fn find_by_token_key(&self, token_key: &str) -> StoreResult<Option<Session>>;

    /// Persist a session, replacing the stored record.
    fn save(&self, session: &Session) -> StoreResult<()>;
}

/// Source of "now" for activity timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Key a session is stored under: URL-safe base64 of SHA-256(token).
pub fn token_key(token: &str) -> String {
    Base64UrlUnpadded::encode_string(&Sha256::digest(token.as_bytes()))
}

#[derive(Clone)]
pub struct SessionTracker {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
}

impl SessionTracker {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn find_by_token(&self, token: &str) -> StoreResult<Option<Session>> {
        self.store.find_by_token_key(&token_key(token))
    }

    /// Set `last_active` to now and persist.
    ///
    /// The timestamp never moves backwards, so a clock step between two
    /// requests leaves it unchanged instead of rewinding it.
    pub fn refresh_last_active(&self, mut session: Session) -> StoreResult<Session> {
        let now = self.clock.now();
        if now > session.last_active {
            session.last_active = now;
        }
        self.store.save(&session)?;
        Ok(session)
    }

    /// Find the token's session and refresh it, swallowing every failure.
    ///
    /// Returns the refreshed session, or `None` when there was nothing to
    /// refresh or the store failed.
    pub fn touch(&self, token: &str) -> Option<Session> {
        let session = match self.find_by_token(token) {
            Ok(Some(session)) => session,
            Ok(None) => {
                tracing::debug!("No session recorded for token; skipping activity refresh");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session lookup failed; skipping activity refresh");
                return None;
            }
        };

        match self.refresh_last_active(session) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to refresh session activity");
                None
            }
        }
    }
}
