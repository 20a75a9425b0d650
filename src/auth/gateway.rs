// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance and request authorization.
//!
//! ## Authorization Steps
//!
//! 1. Reject a missing or blank `Authorization` value
//! 2. Strip a leading `Bearer ` (only at position 0)
//! 3. Require three segments and a matching signature
//! 4. Decode the claims and reject them once `exp` has been reached
//!
//! The gateway does no I/O. Session bookkeeping (which token is a user's
//! current one) lives with the caller.

use chrono::Utc;

use super::{
    claims::{AuthenticatedUser, Claims},
    codec::{TokenCodec, TokenParts},
    error::AuthError,
};

/// Default token lifetime (1 hour).
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Clone)]
pub struct AuthGateway {
    codec: TokenCodec,
    ttl_secs: i64,
}

impl AuthGateway {
    pub fn new(codec: TokenCodec) -> Self {
        Self {
            codec,
            ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    /// Set the token lifetime in seconds.
    pub fn with_ttl(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Mint a token for a user whose credentials were already checked.
    pub fn issue_token(&self, user_id: u64, username: &str) -> Result<String, AuthError> {
        self.issue_token_at(user_id, username, Utc::now().timestamp())
    }

    /// [`AuthGateway::issue_token`] with an explicit issuance time.
    pub fn issue_token_at(
        &self,
        user_id: u64,
        username: &str,
        issued_at: i64,
    ) -> Result<String, AuthError> {
        let exp = issued_at
            .checked_add(self.ttl_secs)
            .ok_or(AuthError::Encoding)?;
        let claims = Claims {
            user_id,
            username: username.to_string(),
            exp,
        };
        Ok(self.codec.encode_json(&claims)?)
    }

    /// Validate a raw `Authorization` header value.
    pub fn authorize(&self, header: Option<&str>) -> Result<AuthenticatedUser, AuthError> {
        self.authorize_at(header, Utc::now().timestamp())
    }

    /// [`AuthGateway::authorize`] against an explicit current time.
    pub fn authorize_at(
        &self,
        header: Option<&str>,
        now: i64,
    ) -> Result<AuthenticatedUser, AuthError> {
        let token = bearer_token(header)?;

        TokenParts::split(token)?;
        if !self.codec.verify(token)? {
            return Err(AuthError::InvalidSignature);
        }

        let claims: Claims = self.codec.decode_json(token)?;
        if claims.is_expired_at(now) {
            return Err(AuthError::Expired);
        }

        Ok(claims.into())
    }
}

/// Pull the token out of an `Authorization` header value.
///
/// `Bearer ` is stripped only when the value starts with it; anything else is
/// taken as the bare token.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let value = header
        .filter(|value| !value.trim().is_empty())
        .ok_or(AuthError::MissingHeader)?;
    Ok(value.strip_prefix(BEARER_PREFIX).unwrap_or(value))
}
