// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. Types derive `Serialize`
//! and/or `Deserialize` plus `ToSchema` for the OpenAPI document.
//!
//! ## Model Categories
//!
//! - **Account**: login, registration, token verification
//! - **Cart**: per-user cart lines keyed by product id
//! - **Store documents**: opaque JSON passed through to/from the store API

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Account Models
// =============================================================================

/// Credentials posted to `/login`.
///
/// Missing fields deserialize as empty strings so the handler can answer
/// with `missing_fields` instead of a JSON rejection.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Public view of a user account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserSummary {
    pub id: u64,
    pub username: String,
    pub email: String,
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token for subsequent calls
    pub token: String,
    pub user: UserSummary,
}

/// New account posted to `/register`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of `/verify` for a valid token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user_id: u64,
    pub username: String,
    /// Expiration timestamp (epoch seconds)
    pub exp: i64,
}

// =============================================================================
// Cart Models
// =============================================================================

/// One cart line.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CartItem {
    pub quantity: u64,
    /// Local time the line was last set, `YYYY-MM-DD HH:MM:SS`
    pub added_at: String,
}

/// A user's cart, keyed by product id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(transparent)]
pub struct Cart(pub BTreeMap<String, CartItem>);

/// Body of `/cart/add`. Zero values count as missing.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    #[serde(default)]
    pub product_id: u64,
    #[serde(default)]
    pub quantity: u64,
}

/// Body of `/cart/remove`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RemoveFromCartRequest {
    #[serde(default)]
    pub product_id: u64,
}

// =============================================================================
// Store Documents
// =============================================================================

/// Arbitrary JSON exchanged with the store API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct StoreDocument(pub serde_json::Value);
