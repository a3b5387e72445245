// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Resolving a token subject to a user record.

use std::sync::Arc;

use crate::models::User;
use crate::storage::StoreResult;

/// Read access to user records, owned by the surrounding application.
pub trait UserStore: Send + Sync {
    /// Look up a user by email. A miss is `Ok(None)`, not an error.
    fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

/// Looks up the user a verified token speaks for.
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn UserStore>,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub fn find_by_email(&self, subject: &str) -> StoreResult<Option<User>> {
        let email = subject.trim();
        if email.is_empty() {
            return Ok(None);
        }
        self.store.find_by_email(email)
    }
}
