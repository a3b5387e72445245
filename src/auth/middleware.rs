// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Runs the [`AuthGate`](super::AuthGate) once per request. Rejected
//! requests get the 401 JSON body and never reach the handler; authenticated
//! ones carry the resolved [`User`](crate::models::User) in their extensions,
//! where the [`CurrentUser`](super::CurrentUser) extractor picks it up.
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/api/users/me", get(users::get_current_user))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), auth_gate));
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::Decision;
use crate::state::AppState;

/// Authentication middleware function.
pub async fn auth_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let decision = state
        .gate
        .decide(request.method(), request.uri().path(), request.headers());

    match decision {
        Decision::AllowUnchecked => next.run(request).await,
        Decision::Authenticated(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Decision::Rejected(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::{bearer, mint, mint_with, Fixture, SECRET};
    use crate::auth::CurrentUser;
    use axum::{
        body::{to_bytes, Body},
        http::{header::CONTENT_TYPE, Method, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use tower::ServiceExt;

    async fn whoami(CurrentUser(user): CurrentUser) -> Json<serde_json::Value> {
        Json(serde_json::json!({ "email": user.email }))
    }

    async fn login() -> &'static str {
        "login page"
    }

    fn app(fixture: &Fixture) -> Router {
        let state = fixture.state();
        Router::new()
            .route("/api/widgets", get(whoami).options(|| async { StatusCode::NO_CONTENT }))
            .route("/api/auth/login", post(login))
            .route_layer(axum::middleware::from_fn_with_state(state.clone(), auth_gate))
            .with_state(state)
    }

    fn request(method: Method, uri: &str, authorization: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn send(app: Router, req: Request) -> (StatusCode, Option<String>, Vec<u8>) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, body.to_vec())
    }

    fn rejection(message: &str) -> serde_json::Value {
        serde_json::json!({ "success": false, "message": message })
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_user() {
        let fixture = Fixture::new();
        fixture.add_user("alice@example.com");
        let token = mint("alice@example.com");

        let (status, _, body) = send(
            app(&fixture),
            request(Method::GET, "/api/widgets", Some(&bearer(&token))),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["email"], "alice@example.com");
    }

    #[tokio::test]
    async fn basic_scheme_is_missing_token() {
        let fixture = Fixture::new();
        let (status, content_type, body) = send(
            app(&fixture),
            request(Method::GET, "/api/widgets", Some("Basic xyz")),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, rejection("Missing token"));
    }

    #[tokio::test]
    async fn empty_authorization_header_is_missing_token() {
        let fixture = Fixture::new();
        let (status, _, body) =
            send(app(&fixture), request(Method::GET, "/api/widgets", Some(""))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, rejection("Missing token"));
    }

    #[tokio::test]
    async fn options_without_header_is_allowed() {
        let fixture = Fixture::new();
        let (status, _, _) =
            send(app(&fixture), request(Method::OPTIONS, "/api/widgets", None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn expired_token_is_invalid() {
        let fixture = Fixture::new();
        fixture.add_user("alice@example.com");
        let expired = mint_with(SECRET, "alice@example.com", -3600, None);

        let (status, _, body) = send(
            app(&fixture),
            request(Method::GET, "/api/widgets", Some(&bearer(&expired))),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, rejection("Invalid or expired token"));
    }

    #[tokio::test]
    async fn unknown_user_is_rejected() {
        let fixture = Fixture::new();
        let token = mint("ghost@example.com");

        let (status, _, body) = send(
            app(&fixture),
            request(Method::GET, "/api/widgets", Some(&bearer(&token))),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, rejection("User not found"));
    }

    #[tokio::test]
    async fn public_auth_path_ignores_header() {
        let fixture = Fixture::new();
        for authorization in [None, Some("Basic xyz"), Some("Bearer not-a-token")] {
            let (status, _, body) = send(
                app(&fixture),
                request(Method::POST, "/api/auth/login", authorization),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, b"login page");
        }
    }

    #[tokio::test]
    async fn session_activity_is_refreshed_per_request() {
        let fixture = Fixture::new();
        let alice = fixture.add_user("alice@example.com");
        let token = mint("alice@example.com");
        let session = fixture.add_session(&alice, &token);

        let mut seen = vec![session.last_active];
        for _ in 0..2 {
            let (status, _, _) = send(
                app(&fixture),
                request(Method::GET, "/api/widgets", Some(&bearer(&token))),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            seen.push(fixture.sessions.get(&session.token_key).unwrap().last_active);
        }

        assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}
