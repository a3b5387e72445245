// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{any, get},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::auth_gate,
    error::{ApiError, FailureBody},
    models::{Session, User},
    state::AppState,
};

pub mod health;
pub mod sessions;
pub mod users;

pub fn router(state: AppState) -> Router {
    // Everything under /api passes through the gate, unknown paths included
    let api_routes = Router::new()
        .route("/api/users/me", get(users::get_current_user))
        .route("/api/sessions/current", get(sessions::get_current_session))
        .route("/api/{*rest}", any(unknown_api_route))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_gate))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(CorsLayer::permissive())
}

async fn unknown_api_route() -> ApiError {
    ApiError::not_found("Route not found")
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        users::get_current_user,
        sessions::get_current_session
    ),
    components(
        schemas(
            User,
            Session,
            FailureBody,
            users::UserMeResponse,
            sessions::CurrentSessionResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Users", description = "Authenticated user identity"),
        (name = "Sessions", description = "Session activity")
    )
)]
struct ApiDoc;
