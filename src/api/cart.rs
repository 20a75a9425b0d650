// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-user cart, kept server-side.

use axum::{extract::State, Json};
use chrono::Local;

use crate::{
    auth::Auth,
    error::ApiError,
    models::{AddToCartRequest, Cart, RemoveFromCartRequest},
    state::AppState,
};

const ADDED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[utoipa::path(
    get,
    path = "/headlesswoo/v1/cart",
    tag = "Cart",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The caller's cart", body = Cart),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_cart(Auth(user): Auth, State(state): State<AppState>) -> Json<Cart> {
    Json(state.store.read().await.cart(user.user_id))
}

/// Set the quantity of a product in the cart.
#[utoipa::path(
    post,
    path = "/headlesswoo/v1/cart/add",
    request_body = AddToCartRequest,
    tag = "Cart",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated cart", body = Cart),
        (status = 400, description = "Product id or quantity missing"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn add_to_cart(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<Cart>, ApiError> {
    if request.product_id == 0 || request.quantity == 0 {
        return Err(ApiError::missing_fields("Product ID and quantity are required"));
    }

    let added_at = Local::now().format(ADDED_AT_FORMAT).to_string();
    let cart = state.store.write().await.add_to_cart(
        user.user_id,
        request.product_id,
        request.quantity,
        added_at,
    );
    Ok(Json(cart))
}

#[utoipa::path(
    post,
    path = "/headlesswoo/v1/cart/remove",
    request_body = RemoveFromCartRequest,
    tag = "Cart",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated cart", body = Cart),
        (status = 400, description = "Product id missing"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn remove_from_cart(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<Cart>, ApiError> {
    if request.product_id == 0 {
        return Err(ApiError::missing_fields("Product ID is required"));
    }

    let cart = state
        .store
        .write()
        .await
        .remove_from_cart(user.user_id, request.product_id);
    Ok(Json(cart))
}
