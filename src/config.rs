// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults and the loaders that turn them into
//! typed configuration. Configuration is read once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | Shared HMAC secret used to verify bearer tokens | Required |
//! | `JWT_ISSUER` | Expected `iss` claim | Optional |
//! | `AUTH_PUBLIC_PREFIX` | Path prefix that bypasses authentication | `/api/auth` |
//! | `AUTH_PREFLIGHT_METHOD` | Method that bypasses authentication | `OPTIONS` |
//! | `DATA_DIR` | Directory for the embedded user/session database | In-memory stores |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::Method;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";
pub const PUBLIC_PREFIX_ENV: &str = "AUTH_PUBLIC_PREFIX";
pub const PREFLIGHT_METHOD_ENV: &str = "AUTH_PREFLIGHT_METHOD";

/// Environment variable name for the data directory.
///
/// When set, users and sessions are read from `$DATA_DIR/vault-gate.redb`.
/// When unset, the server runs with empty in-memory stores.
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PUBLIC_PREFIX: &str = "/api/auth";
pub const DEFAULT_PREFLIGHT_METHOD: &str = "OPTIONS";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// File name of the embedded database inside `DATA_DIR`.
pub const DATABASE_FILE: &str = "vault-gate.redb";

/// Configuration errors raised while loading from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Which requests the auth gate lets through without looking at a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Requests whose path starts with this prefix skip authentication.
    pub public_prefix: String,
    /// Requests with this method (CORS pre-flight) skip authentication.
    pub preflight_method: Method,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            public_prefix: DEFAULT_PUBLIC_PREFIX.to_string(),
            preflight_method: Method::OPTIONS,
        }
    }
}

impl GateConfig {
    pub fn with_public_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.public_prefix = prefix.into();
        self
    }

    pub fn with_preflight_method(mut self, method: Method) -> Self {
        self.preflight_method = method;
        self
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Full server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
    pub gate: GateConfig,
    pub data_dir: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let jwt_secret = get(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;

        let port = match get(PORT_ENV) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                var: PORT_ENV,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let preflight_method = match get(PREFLIGHT_METHOD_ENV) {
            Some(raw) => Method::from_bytes(raw.trim().as_bytes()).map_err(|_| {
                ConfigError::Invalid {
                    var: PREFLIGHT_METHOD_ENV,
                    value: raw,
                }
            })?,
            None => Method::OPTIONS,
        };

        let log_format = match get(LOG_FORMAT_ENV).as_deref().map(str::trim) {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            jwt_secret,
            jwt_issuer: get(JWT_ISSUER_ENV),
            gate: GateConfig {
                public_prefix: get(PUBLIC_PREFIX_ENV)
                    .unwrap_or_else(|| DEFAULT_PUBLIC_PREFIX.to_string()),
                preflight_method,
            },
            data_dir: get(DATA_DIR_ENV).map(PathBuf::from),
            log_format,
        })
    }

    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::Invalid {
            var: HOST_ENV,
            value: raw,
        })
    }
}
