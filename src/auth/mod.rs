// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! HS256 bearer tokens for the mobile client.
//!
//! ## Auth Flow
//!
//! 1. Client posts credentials to `/login`
//! 2. Server checks them against the user directory and mints a token
//!    carrying `user_id`, `username` and `exp`
//! 3. Client sends `Authorization: Bearer <token>` on every later call
//! 4. Server:
//!    - verifies the signature (constant-time HMAC comparison)
//!    - rejects the token once `exp` has passed
//!    - requires it to be the user's current token (logout clears it)
//!
//! ## Security
//!
//! - Only HS256 is produced or accepted; the header is fixed
//! - The secret is configured once at startup and never logged
//! - Running on the built-in default secret is reported at startup and by
//!   the readiness probe

pub mod claims;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod gateway;

pub use claims::{AuthenticatedUser, Claims};
pub use codec::TokenCodec;
pub use error::{AuthError, TokenError};
pub use extractor::Auth;
pub use gateway::{AuthGateway, DEFAULT_TOKEN_TTL_SECS};
