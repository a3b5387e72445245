// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Store Adapters
//!
//! Implementations of the [`UserStore`](crate::auth::UserStore) and
//! [`SessionStore`](crate::auth::SessionStore) collaborator traits.
//!
//! - `memory` - process-local maps, used when no data directory is configured
//!   and throughout the tests
//! - `redb_store` - embedded ACID database under `DATA_DIR`
//!
//! User and session records are written by the login flow, not by the gate.
//! The `insert_*` helpers exist for seeding.

pub mod memory;
pub mod redb_store;

pub use memory::{InMemorySessionStore, InMemoryUserStore};
pub use redb_store::RedbStore;

/// Errors raised by a user or session store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Key under which a user is stored: emails compare case-insensitively.
pub(crate) fn email_key(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
