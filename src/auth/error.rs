// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! [`TokenError`] is what the codec reports about a token's framing.
//! [`AuthError`] is what the gateway reports about a request's credentials,
//! and knows how to render itself as an HTTP response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Codec-level failures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    /// The payload could not be serialized.
    #[error("payload could not be encoded: {0}")]
    Encoding(String),

    /// Wrong segment count or a segment that is not valid base64url.
    #[error("token is malformed: {0}")]
    Malformed(&'static str),

    /// The HMAC could not be keyed with the configured secret.
    #[error("signing key was rejected")]
    InvalidKey,
}

/// Authentication error type.
///
/// Every variant except [`AuthError::Encoding`] is a credential problem on
/// the caller's side and maps to 401.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// No authorization header, or an empty one
    MissingHeader,
    /// Token does not split into three segments or a segment is not base64url
    MalformedToken,
    /// Signature does not match the header and payload
    InvalidSignature,
    /// `exp` claim is at or before the current time
    Expired,
    /// Token is well-formed and signed but is no longer the user's current token
    Revoked,
    /// A token could not be minted
    Encoding,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::Expired => "token_expired",
            AuthError::Revoked => "token_revoked",
            AuthError::Encoding => "token_encoding_failed",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingHeader
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::Expired
            | AuthError::Revoked => StatusCode::UNAUTHORIZED,
            AuthError::Encoding => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed(_) => AuthError::MalformedToken,
            TokenError::Encoding(_) | TokenError::InvalidKey => AuthError::Encoding,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingHeader => write!(f, "Authorization header is required"),
            AuthError::MalformedToken => write!(f, "Token is malformed"),
            AuthError::InvalidSignature => write!(f, "Token signature is invalid"),
            AuthError::Expired => write!(f, "Token has expired"),
            AuthError::Revoked => write!(f, "Token is no longer active"),
            AuthError::Encoding => write!(f, "Token could not be issued"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
