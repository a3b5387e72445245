// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Vault Gate - Bearer Token Authentication Gate
//!
//! This crate decides, for every request to the vault API, whether it may
//! proceed. It verifies the bearer token, resolves the user the token speaks
//! for, keeps the session's activity timestamp fresh, and answers everything
//! else with a uniform 401 JSON body.
//!
//! ## Modules
//!
//! - `auth` - Token verification, identity resolution, session tracking and
//!   the gate middleware
//! - `api` - HTTP router and handlers (Axum)
//! - `storage` - In-memory and redb-backed user/session stores

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
