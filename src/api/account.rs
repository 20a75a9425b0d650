// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints: login, logout, registration and token verification.

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::{
    auth::Auth,
    error::ApiError,
    models::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest, VerifyResponse},
    state::AppState,
    store::{register_user, verify_credentials},
};

/// Exchange credentials for a bearer token.
///
/// The new token replaces any token previously issued to the user.
#[utoipa::path(
    post,
    path = "/headlesswoo/v1/login",
    request_body = LoginRequest,
    tag = "Account",
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Username or password missing"),
        (status = 401, description = "Invalid credentials"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::missing_fields("Username and password are required"));
    }

    let account = verify_credentials(&state.store, &request.username, &request.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("login_failed", "Invalid credentials"))?;

    let token = state.gateway.issue_token(account.id, &account.username)?;
    state
        .store
        .write()
        .await
        .set_current_token(account.id, token.clone());

    info!(user_id = account.id, "User logged in");
    Ok(Json(LoginResponse {
        token,
        user: account.summary(),
    }))
}

/// End the current session. The presented token stops working.
#[utoipa::path(
    post,
    path = "/headlesswoo/v1/logout",
    tag = "Account",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn logout(Auth(user): Auth, State(state): State<AppState>) -> Json<MessageResponse> {
    state.store.write().await.clear_current_token(user.user_id);
    info!(user_id = user.user_id, "User logged out");
    Json(MessageResponse::new("Logged out successfully"))
}

#[utoipa::path(
    post,
    path = "/headlesswoo/v1/register",
    request_body = RegisterRequest,
    tag = "Account",
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 400, description = "Missing fields or registration failed"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    if request.username.is_empty() || request.password.is_empty() || request.email.is_empty() {
        return Err(ApiError::missing_fields("Required fields are missing"));
    }

    let account =
        register_user(&state.store, &request.username, &request.password, &request.email).await?;

    info!(user_id = account.id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Registration successful")),
    ))
}

/// Report the claims of a valid, current token.
#[utoipa::path(
    post,
    path = "/headlesswoo/v1/verify",
    tag = "Account",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Token is valid", body = VerifyResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn verify(Auth(user): Auth) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        valid: true,
        user_id: user.user_id,
        username: user.username,
        exp: user.expires_at,
    })
}
