// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried in the payload of every token we issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Numeric user id from the user directory
    pub user_id: u64,

    /// Login name at issuance time
    pub username: String,

    /// Expiration timestamp (epoch seconds)
    pub exp: i64,
}

impl Claims {
    /// True when `exp` is at or before `now`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }
}

/// Authenticated user information extracted from a verified token.
///
/// This is the identity handed to every protected handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Numeric user id
    pub user_id: u64,

    /// Login name
    pub username: String,

    /// Token expiration (epoch seconds)
    pub expires_at: i64,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            expires_at: claims.exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims() -> Claims {
        Claims {
            user_id: 42,
            username: "alice".to_string(),
            exp: 1700003600,
        }
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let json = serde_json::to_string(&sample_claims()).unwrap();
        assert_eq!(json, r#"{"user_id":42,"username":"alice","exp":1700003600}"#);
    }

    #[test]
    fn expiry_is_inclusive() {
        let claims = sample_claims();
        assert!(!claims.is_expired_at(1700003599));
        assert!(claims.is_expired_at(1700003600));
        assert!(claims.is_expired_at(1700003601));
    }

    #[test]
    fn authenticated_user_from_claims() {
        let user = AuthenticatedUser::from(sample_claims());
        assert_eq!(user.user_id, 42);
        assert_eq!(user.username, "alice");
        assert_eq!(user.expires_at, 1700003600);
    }
}
