// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory user and session stores.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{email_key, StoreError, StoreResult};
use crate::auth::{SessionStore, UserStore};
use crate::models::{Session, User};

fn poisoned(store: &str) -> StoreError {
    StoreError::Unavailable(format!("{store} lock poisoned"))
}

/// Users keyed by lowercase email.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user. Returns the previous record for that email.
    pub fn insert(&self, user: User) -> StoreResult<Option<User>> {
        let mut users = self.users.write().map_err(|_| poisoned("user store"))?;
        Ok(users.insert(email_key(&user.email), user))
    }

    pub fn len(&self) -> usize {
        self.users.read().map(|users| users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UserStore for InMemoryUserStore {
    fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().map_err(|_| poisoned("user store"))?;
        Ok(users.get(&email_key(email)).cloned())
    }
}

/// Sessions keyed by token digest.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: Session) -> StoreResult<()> {
        let mut sessions = self.sessions.write().map_err(|_| poisoned("session store"))?;
        sessions.insert(session.token_key.clone(), session);
        Ok(())
    }

    /// Read a session without going through the tracker.
    pub fn get(&self, token_key: &str) -> Option<Session> {
        self.sessions.read().ok()?.get(token_key).cloned()
    }
}

impl SessionStore for InMemorySessionStore {
    fn find_by_token_key(&self, token_key: &str) -> StoreResult<Option<Session>> {
        let sessions = self.sessions.read().map_err(|_| poisoned("session store"))?;
        Ok(sessions.get(token_key).cloned())
    }

    fn save(&self, session: &Session) -> StoreResult<()> {
        self.insert(session.clone())
    }
}
