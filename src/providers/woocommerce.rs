// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! WooCommerce REST API (`/wp-json/wc/v3`) client.
//!
//! Requests are authenticated with HTTP Basic auth built from the configured
//! consumer key and secret. Bodies are passed through untouched.

use std::time::Duration;

use reqwest::{Client, Method};
use serde_json::Value;
use tracing::debug;

use crate::config::Config;

const API_PREFIX: &str = "/wp-json/wc/v3/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreApiError {
    #[error("Store API request failed: {0}")]
    Transport(String),

    #[error("WooCommerce API request failed with status {0}")]
    Status(u16),

    #[error("Store API response was invalid: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone)]
pub struct WooClient {
    base_url: String,
    api_key: String,
    api_secret: String,
    http: Client,
}

impl WooClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, StoreApiError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreApiError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            http,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, StoreApiError> {
        Self::new(
            config.store_base_url.clone(),
            config.api_key.clone(),
            config.api_secret().to_string(),
        )
    }

    /// Full URL of an endpoint such as `products/categories`.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}{}{}",
            self.base_url,
            API_PREFIX,
            endpoint.trim_start_matches('/')
        )
    }

    pub async fn get(
        &self,
        endpoint: &str,
        query: &[(String, String)],
    ) -> Result<Value, StoreApiError> {
        self.request(Method::GET, endpoint, query, None).await
    }

    pub async fn post(&self, endpoint: &str, body: &Value) -> Result<Value, StoreApiError> {
        self.request(Method::POST, endpoint, &[], Some(body)).await
    }

    /// Send a request and return the decoded JSON body.
    ///
    /// A body is only attached to POST and PUT. Any 2xx status is success.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, StoreApiError> {
        let url = self.endpoint_url(endpoint);
        debug!(%method, endpoint, "Forwarding request to store API");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .basic_auth(&self.api_key, Some(&self.api_secret));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body.filter(|_| method == Method::POST || method == Method::PUT) {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreApiError::Transport(format!("{method} {endpoint} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreApiError::Status(status.as_u16()));
        }

        response.json().await.map_err(|e| {
            StoreApiError::InvalidResponse(format!("{method} {endpoint} invalid JSON: {e}"))
        })
    }
}
