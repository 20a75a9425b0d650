// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{AuthGateway, TokenCodec};
use crate::config::Config;
use crate::providers::woocommerce::{StoreApiError, WooClient};
use crate::store::InMemoryStore;

/// What the readiness probe reports about configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigStatus {
    pub uses_default_secret: bool,
    pub has_store_credentials: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<AuthGateway>,
    pub store: Arc<RwLock<InMemoryStore>>,
    pub woo: WooClient,
    pub config_status: ConfigStatus,
}

impl AppState {
    pub fn new(gateway: AuthGateway, store: InMemoryStore, woo: WooClient) -> Self {
        Self {
            gateway: Arc::new(gateway),
            store: Arc::new(RwLock::new(store)),
            woo,
            config_status: ConfigStatus::default(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, StoreApiError> {
        let gateway = AuthGateway::new(TokenCodec::new(config.jwt_secret()))
            .with_ttl(config.token_ttl_secs);
        let woo = WooClient::from_config(config)?;

        let mut state = Self::new(gateway, InMemoryStore::new(), woo);
        state.config_status = ConfigStatus {
            uses_default_secret: config.uses_default_secret(),
            has_store_credentials: config.has_store_credentials(),
        };
        Ok(state)
    }

    /// State for tests: given secret, default TTL, store API at `store_base_url`.
    #[cfg(test)]
    pub fn for_tests(secret: &str, store_base_url: &str) -> Self {
        let gateway = AuthGateway::new(TokenCodec::new(secret));
        let woo = WooClient::new(store_base_url, "ck_test", "cs_test")
            .unwrap_or_else(|e| panic!("test store client: {e}"));
        let mut state = Self::new(gateway, InMemoryStore::new(), woo);
        state.config_status.uses_default_secret = secret == crate::config::DEFAULT_JWT_SECRET;
        state.config_status.has_store_credentials = true;
        state
    }
}
