// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is resolved once at startup into a [`Config`] and handed to
//! the components that need it. Nothing reads settings after that.
//!
//! ## Settings (`headlesswoo_options`)
//!
//! | Key | Description | Default |
//! |-----|-------------|---------|
//! | `headlesswoo_field_jwt_secret` | HMAC secret for bearer tokens | `default_secret` (insecure) |
//! | `headlesswoo_field_jwt_expiration` | Token lifetime in seconds | `3600` |
//! | `headlesswoo_field_api_key` | Store REST API consumer key | empty |
//! | `headlesswoo_field_api_key_secret` | Store REST API consumer secret | empty |
//!
//! Settings come from the JSON file named by `HEADLESSWOO_SETTINGS_FILE`, or
//! from the environment (`HEADLESSWOO_FIELD_JWT_SECRET`, ...) when unset.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HEADLESSWOO_SETTINGS_FILE` | Settings file path | unset (env settings) |
//! | `STORE_BASE_URL` | Base URL of the store site | `http://localhost` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM files; serve HTTPS when both set | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde_json::Value;
use url::Url;
use zeroize::Zeroizing;

use crate::auth::DEFAULT_TOKEN_TTL_SECS;

/// Name of the settings group holding every option below.
pub const SETTINGS_NAME: &str = "headlesswoo_options";

pub const JWT_SECRET_KEY: &str = "headlesswoo_field_jwt_secret";
pub const JWT_EXPIRATION_KEY: &str = "headlesswoo_field_jwt_expiration";
pub const API_KEY_KEY: &str = "headlesswoo_field_api_key";
pub const API_SECRET_KEY: &str = "headlesswoo_field_api_key_secret";

/// Secret used when none is configured. Tokens signed with it are forgeable
/// by anyone who has read this file.
pub const DEFAULT_JWT_SECRET: &str = "default_secret";

pub const SETTINGS_FILE_ENV: &str = "HEADLESSWOO_SETTINGS_FILE";
pub const STORE_BASE_URL_ENV: &str = "STORE_BASE_URL";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Longest accepted token lifetime (ten years).
pub const MAX_TOKEN_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

const DEFAULT_STORE_BASE_URL: &str = "http://localhost";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("headlesswoo_field_jwt_expiration must be between 1 and 315360000 seconds, got {0:?}")]
    InvalidExpiration(String),

    #[error("invalid store base URL {0:?}")]
    InvalidBaseUrl(String),

    #[error("invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    IncompleteTls,

    #[error("failed to read settings file {path}: {reason}")]
    SettingsFile { path: String, reason: String },
}

/// Key-value settings source.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
}

impl SettingsStore for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Reads `headlesswoo_field_x` from `HEADLESSWOO_FIELD_X`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSettings;

impl EnvSettings {
    pub fn var_name(key: &str) -> String {
        key.to_ascii_uppercase()
    }
}

impl SettingsStore for EnvSettings {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(Self::var_name(key)).ok()
    }
}

/// Settings loaded from a JSON document of the form
/// `{"headlesswoo_options": {"headlesswoo_field_jwt_secret": "...", ...}}`.
#[derive(Debug, Default, Clone)]
pub struct FileSettings {
    values: HashMap<String, String>,
}

impl FileSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let settings_error = |reason: String| ConfigError::SettingsFile {
            path: path.display().to_string(),
            reason,
        };

        let raw = std::fs::read_to_string(path).map_err(|e| settings_error(e.to_string()))?;
        Self::from_json(&raw).map_err(settings_error)
    }

    pub fn from_json(raw: &str) -> Result<Self, String> {
        let document: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        let options = match document.get(SETTINGS_NAME) {
            None | Some(Value::Null) => return Ok(Self::default()),
            Some(Value::Object(options)) => options,
            Some(_) => return Err(format!("{SETTINGS_NAME} must be an object")),
        };

        let values = options
            .iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((key.clone(), value))
            })
            .collect();

        Ok(Self { values })
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Everything the service needs, resolved once at startup.
#[derive(Clone)]
pub struct Config {
    jwt_secret: Zeroizing<String>,
    uses_default_secret: bool,
    pub token_ttl_secs: i64,
    pub store_base_url: String,
    pub api_key: String,
    api_secret: Zeroizing<String>,
    pub bind_addr: SocketAddr,
    pub tls: Option<TlsPaths>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

impl Config {
    /// Resolve options from `settings`; server-level values take defaults.
    pub fn from_settings(
        settings: &dyn SettingsStore,
        store_base_url: &str,
    ) -> Result<Self, ConfigError> {
        let configured_secret = non_empty(settings.get(JWT_SECRET_KEY));
        let uses_default_secret = configured_secret.is_none();
        let jwt_secret = configured_secret.unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string());

        let token_ttl_secs = match non_empty(settings.get(JWT_EXPIRATION_KEY)) {
            None => DEFAULT_TOKEN_TTL_SECS,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(ttl) if (1..=MAX_TOKEN_TTL_SECS).contains(&ttl) => ttl,
                _ => return Err(ConfigError::InvalidExpiration(raw)),
            },
        };

        let base = Url::parse(store_base_url)
            .map_err(|_| ConfigError::InvalidBaseUrl(store_base_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl(store_base_url.to_string()));
        }

        Ok(Self {
            jwt_secret: Zeroizing::new(jwt_secret),
            uses_default_secret,
            token_ttl_secs,
            store_base_url: store_base_url.trim_end_matches('/').to_string(),
            api_key: settings.get(API_KEY_KEY).unwrap_or_default(),
            api_secret: Zeroizing::new(settings.get(API_SECRET_KEY).unwrap_or_default()),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            tls: None,
        })
    }

    /// Load from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let store_base_url = env_or_default(STORE_BASE_URL_ENV, DEFAULT_STORE_BASE_URL);
        let mut config = match std::env::var(SETTINGS_FILE_ENV) {
            Ok(path) => Self::from_settings(&FileSettings::load(path)?, &store_base_url)?,
            Err(_) => Self::from_settings(&EnvSettings, &store_base_url)?,
        };

        let host = env_or_default(HOST_ENV, DEFAULT_HOST);
        let port = env_or_default(PORT_ENV, &DEFAULT_PORT.to_string());
        config.bind_addr = format!("{host}:{port}")
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(format!("{host}:{port}")))?;

        config.tls = match (
            std::env::var(TLS_CERT_PATH_ENV).ok(),
            std::env::var(TLS_KEY_PATH_ENV).ok(),
        ) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        Ok(config)
    }

    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// True when no secret was configured and [`DEFAULT_JWT_SECRET`] is in use.
    pub fn uses_default_secret(&self) -> bool {
        self.uses_default_secret
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }

    /// Whether both store API credentials are present.
    pub fn has_store_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("jwt_secret", &"[redacted]")
            .field("uses_default_secret", &self.uses_default_secret)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("store_base_url", &self.store_base_url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[redacted]")
            .field("bind_addr", &self.bind_addr)
            .field("tls", &self.tls)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
