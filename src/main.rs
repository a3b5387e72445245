// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use vault_gate::{
    api::router,
    auth::{AuthGate, IdentityResolver, SessionStore, SessionTracker, TokenVerifier, UserStore},
    config::{LogFormat, ServerConfig, DATABASE_FILE, DEFAULT_LOG_FILTER},
    state::AppState,
    storage::{InMemorySessionStore, InMemoryUserStore, RedbStore},
};

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    init_tracing(config.log_format);

    let users: Arc<dyn UserStore>;
    let sessions: Arc<dyn SessionStore>;
    match &config.data_dir {
        Some(dir) => {
            let path = dir.join(DATABASE_FILE);
            tracing::info!(path = %path.display(), "Opening user/session database");
            let store = Arc::new(RedbStore::open(&path)?);
            users = store.clone();
            sessions = store;
        }
        None => {
            tracing::warn!("DATA_DIR not set; running with empty in-memory stores");
            users = Arc::new(InMemoryUserStore::new());
            sessions = Arc::new(InMemorySessionStore::new());
        }
    }

    let mut verifier = TokenVerifier::new(config.jwt_secret.as_bytes());
    if let Some(issuer) = &config.jwt_issuer {
        verifier = verifier.with_issuer(issuer);
    }

    let gate = AuthGate::new(
        config.gate.clone(),
        verifier,
        IdentityResolver::new(users),
        SessionTracker::new(sessions),
    );
    let app = router(AppState::new(gate));

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        public_prefix = %config.gate.public_prefix,
        preflight_method = %config.gate.preflight_method,
        "Vault gate listening (docs at /docs)"
    );

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                    shutdown.cancel();
                }
                Err(e) => tracing::warn!(error = %e, "Failed to listen for shutdown signal"),
            }
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
