// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded user/session database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: lowercase email → serialized User
//! - `sessions`: token key → serialized Session

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::{email_key, StoreResult};
use crate::auth::{SessionStore, UserStore};
use crate::models::{Session, User};

// =============================================================================
// Table Definitions
// =============================================================================

/// Users: lowercase email → User (JSON bytes).
const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Sessions: token key → Session (JSON bytes).
const SESSIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");

// =============================================================================
// RedbStore
// =============================================================================

/// Persistent user and session store.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create tables so read transactions on a fresh file don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(SESSIONS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Insert or replace a user record.
    pub fn insert_user(&self, user: &User) -> StoreResult<()> {
        let json = serde_json::to_vec(user)?;
        let key = email_key(&user.email);

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(USERS)?;
            table.insert(key.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Insert or replace a session record.
    pub fn insert_session(&self, session: &Session) -> StoreResult<()> {
        let json = serde_json::to_vec(session)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SESSIONS)?;
            table.insert(session.token_key.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

impl UserStore for RedbStore {
    fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let key = email_key(email);
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(key.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }
}

impl SessionStore for RedbStore {
    fn find_by_token_key(&self, token_key: &str) -> StoreResult<Option<Session>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SESSIONS)?;
        match table.get(token_key)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn save(&self, session: &Session) -> StoreResult<()> {
        self.insert_session(session)
    }
}
