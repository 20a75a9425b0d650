// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::debug;

use super::{gateway::bearer_token, AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Extractor for authenticated users.
///
/// Runs [`AuthGateway::authorize`](super::AuthGateway::authorize) on the
/// `Authorization` header, then requires the token to still be the user's
/// current one (set at login, cleared at logout).
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|value| value.to_str().map_err(|_| AuthError::MalformedToken))
            .transpose()?;

        let user = state.gateway.authorize(header).inspect_err(|e| {
            debug!(error_code = e.error_code(), "Rejected bearer token");
        })?;

        let token = bearer_token(header)?;
        if !state.store.read().await.is_current_token(user.user_id, token) {
            debug!(user_id = user.user_id, "Bearer token is not the current session");
            return Err(AuthError::Revoked);
        }

        Ok(Auth(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    const SECRET: &str = "Testing Secret Key";

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = value {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    async fn logged_in(state: &AppState, user_id: u64) -> String {
        let token = state.gateway.issue_token(user_id, "alice").unwrap();
        state
            .store
            .write()
            .await
            .set_current_token(user_id, token.clone());
        token
    }

    #[tokio::test]
    async fn auth_extractor_requires_auth_header() {
        let state = AppState::for_tests(SECRET, "http://127.0.0.1:9");
        let mut parts = parts_with_header(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_succeeds_with_current_token() {
        let state = AppState::for_tests(SECRET, "http://127.0.0.1:9");
        let token = logged_in(&state, 42).await;
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));

        let Auth(user) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.user_id, 42);
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn auth_extractor_rejects_cleared_session() {
        let state = AppState::for_tests(SECRET, "http://127.0.0.1:9");
        let token = logged_in(&state, 42).await;
        state.store.write().await.clear_current_token(42);
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::Revoked)));
    }

    #[tokio::test]
    async fn auth_extractor_rejects_superseded_token() {
        let state = AppState::for_tests(SECRET, "http://127.0.0.1:9");
        let first = logged_in(&state, 42).await;
        state
            .store
            .write()
            .await
            .set_current_token(42, "newer".to_string());
        let mut parts = parts_with_header(Some(&format!("Bearer {first}")));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::Revoked)));
    }

    #[tokio::test]
    async fn auth_extractor_checks_signature_before_session() {
        let state = AppState::for_tests(SECRET, "http://127.0.0.1:9");
        let other = AppState::for_tests("another secret", "http://127.0.0.1:9");
        let token = logged_in(&other, 42).await;
        state.store.write().await.set_current_token(42, token.clone());
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
    }

    #[tokio::test]
    async fn auth_extractor_rejects_malformed_token() {
        let state = AppState::for_tests(SECRET, "http://127.0.0.1:9");
        let mut parts = parts_with_header(Some("Bearer a.b"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MalformedToken)));
    }
}
