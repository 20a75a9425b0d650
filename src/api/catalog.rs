// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Product and category listing, forwarded to the store API.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{auth::Auth, error::ApiError, models::StoreDocument, state::AppState};

/// List products. The query string is passed through unchanged.
#[utoipa::path(
    get,
    path = "/headlesswoo/v1/products",
    tag = "Catalog",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Products from the store", body = StoreDocument),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn list_products(
    Auth(_user): Auth,
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<StoreDocument>, ApiError> {
    let products = state.woo.get("products", &params).await?;
    Ok(Json(StoreDocument(products)))
}

#[utoipa::path(
    get,
    path = "/headlesswoo/v1/product/{id}",
    params(
        ("id" = u64, Path, description = "Store product id")
    ),
    tag = "Catalog",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Product from the store", body = StoreDocument),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_product(
    Auth(_user): Auth,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<StoreDocument>, ApiError> {
    let product = state.woo.get(&format!("products/{id}"), &[]).await?;
    Ok(Json(StoreDocument(product)))
}

#[utoipa::path(
    get,
    path = "/headlesswoo/v1/categories",
    tag = "Catalog",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Product categories from the store", body = StoreDocument),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn list_categories(
    Auth(_user): Auth,
    State(state): State<AppState>,
) -> Result<Json<StoreDocument>, ApiError> {
    let categories = state.woo.get("products/categories", &[]).await?;
    Ok(Json(StoreDocument(categories)))
}
