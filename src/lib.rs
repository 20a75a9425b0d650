// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HeadlessWoo - token-authenticated REST façade over a WooCommerce store
//!
//! Customers log in against a local account store and receive an HS256
//! bearer token. Protected routes forward catalog and order calls to the
//! store's REST API and keep a per-user cart server-side.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token codec, gateway and request extractor
//! - `config` - Plugin-style settings, environment and file sources
//! - `providers` - WooCommerce REST client
//! - `store` - In-memory accounts, sessions and carts

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod state;
pub mod store;
