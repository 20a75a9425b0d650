// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Orders, forwarded to the store API.

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::{auth::Auth, error::ApiError, models::StoreDocument, state::AppState};

/// List the caller's orders.
#[utoipa::path(
    get,
    path = "/headlesswoo/v1/orders",
    tag = "Orders",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Orders of the authenticated customer", body = StoreDocument),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn list_orders(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<StoreDocument>, ApiError> {
    let query = [("customer".to_string(), user.user_id.to_string())];
    let orders = state.woo.get("orders", &query).await?;
    Ok(Json(StoreDocument(orders)))
}

/// Create an order. The body is forwarded as-is.
#[utoipa::path(
    post,
    path = "/headlesswoo/v1/order/create",
    request_body = StoreDocument,
    tag = "Orders",
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Order created by the store", body = StoreDocument),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn create_order(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(order): Json<StoreDocument>,
) -> Result<(StatusCode, Json<StoreDocument>), ApiError> {
    let created = state.woo.post("orders", &order.0).await?;
    info!(user_id = user.user_id, "Order forwarded to store");
    Ok((StatusCode::CREATED, Json(StoreDocument(created))))
}
