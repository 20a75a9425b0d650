// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::AuthenticatedUser,
    models::{
        AddToCartRequest, Cart, CartItem, LoginRequest, LoginResponse, MessageResponse,
        RegisterRequest, RemoveFromCartRequest, StoreDocument, UserSummary, VerifyResponse,
    },
    state::AppState,
};

pub mod account;
pub mod cart;
pub mod catalog;
pub mod health;
pub mod orders;

pub const API_PREFIX: &str = "/headlesswoo/v1";

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/login", post(account::login))
        .route("/logout", post(account::logout))
        .route("/register", post(account::register))
        .route("/verify", post(account::verify))
        .route("/products", get(catalog::list_products))
        .route("/product/{id}", get(catalog::get_product))
        .route("/categories", get(catalog::list_categories))
        .route("/cart", get(cart::get_cart))
        .route("/cart/add", post(cart::add_to_cart))
        .route("/cart/remove", post(cart::remove_from_cart))
        .route("/orders", get(orders::list_orders))
        .route("/order/create", post(orders::create_order))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .nest(API_PREFIX, v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// Registers the `bearer` scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        account::login,
        account::logout,
        account::register,
        account::verify,
        catalog::list_products,
        catalog::get_product,
        catalog::list_categories,
        cart::get_cart,
        cart::add_to_cart,
        cart::remove_from_cart,
        orders::list_orders,
        orders::create_order,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            RegisterRequest,
            MessageResponse,
            VerifyResponse,
            UserSummary,
            AuthenticatedUser,
            Cart,
            CartItem,
            AddToCartRequest,
            RemoveFromCartRequest,
            StoreDocument,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Account", description = "Login, logout, registration and token verification"),
        (name = "Catalog", description = "Products and categories from the store"),
        (name = "Cart", description = "Per-user cart"),
        (name = "Orders", description = "Orders placed with the store"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
