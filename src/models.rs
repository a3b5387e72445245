// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Records the gate reads from its collaborating stores.
//!
//! Users and sessions are owned by the surrounding application; the gate only
//! reads users and only ever changes a session's `last_active` field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::session::token_key;

/// A registered vault user, identified by a unique email.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct User {
    pub id: String,
    /// Unique login email; also the subject of the user's tokens.
    pub email: String,
    pub name: String,
    /// Application role. Carried for downstream handlers, never checked here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            name: name.into(),
            role: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// A login session bound to the bearer token it was issued with.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    /// Digest of the bearer token. The raw token is never stored.
    pub token_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl Session {
    /// Build a session record for `token`, as the login flow would.
    pub fn new(user_id: impl Into<String>, token: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            token_key: token_key(token),
            device: None,
            ip: None,
            created_at: now,
            last_active: now,
        }
    }
}
