// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared helpers for auth tests: token minting, fixed clocks, failing
//! stores and a ready-made gate over in-memory stores.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};

use super::session::{token_key, Clock};
use super::{
    AuthGate, IdentityResolver, SessionStore, SessionTracker, TokenClaims, TokenVerifier,
    UserStore,
};
use crate::config::GateConfig;
use crate::models::{Session, User};
use crate::state::AppState;
use crate::storage::{InMemorySessionStore, InMemoryUserStore, StoreError, StoreResult};

pub const SECRET: &[u8] = b"test-secret-with-enough-entropy-0123456789";

/// Mint a token for `sub` valid for an hour.
pub fn mint(sub: &str) -> String {
    mint_with(SECRET, sub, 3600, None)
}

/// Mint a token expiring `expires_in` seconds from now (negative: in the past).
pub fn mint_with(secret: &[u8], sub: &str, expires_in: i64, iss: Option<&str>) -> String {
    let now = Utc::now().timestamp();
    let claims = TokenClaims {
        sub: sub.to_string(),
        exp: now + expires_in,
        iat: now,
        iss: iss.map(str::to_string),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret)).unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub struct FailingUserStore;

impl UserStore for FailingUserStore {
    fn find_by_email(&self, _email: &str) -> StoreResult<Option<User>> {
        Err(StoreError::Unavailable("user store offline".to_string()))
    }
}

/// Fails on lookup, or finds a session for one token and fails on save.
pub struct FailingSessionStore {
    known_token: Option<String>,
}

impl FailingSessionStore {
    pub fn on_lookup() -> Self {
        Self { known_token: None }
    }

    pub fn on_save(token: &str) -> Self {
        Self {
            known_token: Some(token.to_string()),
        }
    }
}

impl SessionStore for FailingSessionStore {
    fn find_by_token_key(&self, key: &str) -> StoreResult<Option<Session>> {
        match &self.known_token {
            None => Err(StoreError::Unavailable("session store offline".to_string())),
            Some(token) if token_key(token) == key => Ok(Some(Session::new("user-1", token))),
            Some(_) => Ok(None),
        }
    }

    fn save(&self, _session: &Session) -> StoreResult<()> {
        Err(StoreError::Unavailable("session store read-only".to_string()))
    }
}

/// A gate wired to in-memory stores the test can seed and inspect.
pub struct Fixture {
    pub gate: AuthGate,
    pub users: Arc<InMemoryUserStore>,
    pub sessions: Arc<InMemorySessionStore>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(GateConfig::default())
    }

    pub fn with_config(config: GateConfig) -> Self {
        let users = Arc::new(InMemoryUserStore::new());
        let sessions = Arc::new(InMemorySessionStore::new());
        Self::build(config, users.clone(), sessions.clone(), users, sessions)
    }

    /// Gate reads users from `store`; `add_user` seeds an unused map.
    pub fn with_user_store(store: Arc<dyn UserStore>) -> Self {
        let sessions = Arc::new(InMemorySessionStore::new());
        Self::build(
            GateConfig::default(),
            store,
            sessions.clone(),
            Arc::new(InMemoryUserStore::new()),
            sessions,
        )
    }

    /// Gate whose session store fails every lookup.
    pub fn with_failing_sessions() -> Self {
        let users = Arc::new(InMemoryUserStore::new());
        Self::build(
            GateConfig::default(),
            users.clone(),
            Arc::new(FailingSessionStore::on_lookup()),
            users,
            Arc::new(InMemorySessionStore::new()),
        )
    }

    fn build(
        config: GateConfig,
        gate_users: Arc<dyn UserStore>,
        gate_sessions: Arc<dyn SessionStore>,
        users: Arc<InMemoryUserStore>,
        sessions: Arc<InMemorySessionStore>,
    ) -> Self {
        let gate = AuthGate::new(
            config,
            TokenVerifier::new(SECRET),
            IdentityResolver::new(gate_users),
            SessionTracker::new(gate_sessions),
        );
        Self {
            gate,
            users,
            sessions,
        }
    }

    pub fn add_user(&self, email: &str) -> User {
        let user = User::new(email, "Test User");
        self.users.insert(user.clone()).unwrap();
        user
    }

    pub fn add_session(&self, user: &User, token: &str) -> Session {
        let session = Session::new(user.id.clone(), token);
        self.sessions.insert(session.clone()).unwrap();
        session
    }

    pub fn state(&self) -> AppState {
        AppState::new(self.gate.clone())
    }
}
