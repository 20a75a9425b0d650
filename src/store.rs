// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory user directory, sessions and carts.
//!
//! Stands in for the identity provider and the per-user metadata the store
//! keeps alongside its accounts:
//!
//! - accounts with Argon2 password hashes
//! - the current token of each user (one at a time, last write wins)
//! - one cart per user

use std::collections::HashMap;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use subtle::ConstantTimeEq;
use tokio::{sync::RwLock, task::spawn_blocking};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::error::ApiError;
use crate::models::{Cart, CartItem, UserSummary};

/// A registered account.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: u64,
    pub username: String,
    pub email: String,
    password_hash: String,
}

impl UserAccount {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    users: HashMap<u64, UserAccount>,
    sessions: HashMap<u64, String>,
    carts: HashMap<u64, Cart>,
    next_user_id: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize a registration without touching the directory.
    ///
    /// Returns the trimmed username and lower-cased email.
    pub fn check_registration(
        &self,
        username: &str,
        email: &str,
    ) -> Result<(String, String), ApiError> {
        let username = username.trim();
        let email = email.trim().to_lowercase();

        if username.is_empty() {
            return Err(registration_failed("Cannot create a user with an empty login name."));
        }
        if !is_valid_email(&email) {
            return Err(registration_failed("Invalid email address."));
        }
        self.ensure_available(username, &email)?;
        Ok((username.to_string(), email))
    }

    /// Add an account whose password is already hashed.
    ///
    /// Uniqueness is checked again here; another registration may have won
    /// the name while the hash was being computed.
    pub fn insert_user(
        &mut self,
        username: String,
        email: String,
        password_hash: String,
    ) -> Result<UserAccount, ApiError> {
        self.ensure_available(&username, &email)?;
        self.next_user_id += 1;
        let account = UserAccount {
            id: self.next_user_id,
            username,
            email,
            password_hash,
        };
        self.users.insert(account.id, account.clone());
        Ok(account)
    }

    /// Blocking registration, for callers that own the store outright.
    pub fn create_user(
        &mut self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<UserAccount, ApiError> {
        let (username, email) = self.check_registration(username, email)?;
        let password_hash = hash_password(password)?;
        self.insert_user(username, email, password_hash)
    }

    /// Blocking credential check. Unknown user and wrong password look the same.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<UserAccount> {
        let user = self.find_by_username(username)?;
        verify_password(password, &user.password_hash).then(|| user.clone())
    }

    pub fn user(&self, user_id: u64) -> Option<&UserAccount> {
        self.users.get(&user_id)
    }

    /// Account (with its password hash) for a login name, trimmed.
    pub fn find_by_username(&self, username: &str) -> Option<&UserAccount> {
        let username = username.trim();
        self.users.values().find(|user| user.username == username)
    }

    fn ensure_available(&self, username: &str, email: &str) -> Result<(), ApiError> {
        if self.find_by_username(username).is_some() {
            return Err(registration_failed("Sorry, that username already exists!"));
        }
        if self.users.values().any(|user| user.email == email) {
            return Err(registration_failed("Sorry, that email address is already used!"));
        }
        Ok(())
    }

    pub fn set_current_token(&mut self, user_id: u64, token: String) {
        self.sessions.insert(user_id, token);
    }

    /// Returns whether a token was recorded.
    pub fn clear_current_token(&mut self, user_id: u64) -> bool {
        self.sessions.remove(&user_id).is_some()
    }

    /// Constant-time comparison against the recorded token.
    pub fn is_current_token(&self, user_id: u64, token: &str) -> bool {
        self.sessions
            .get(&user_id)
            .is_some_and(|current| bool::from(current.as_bytes().ct_eq(token.as_bytes())))
    }

    pub fn cart(&self, user_id: u64) -> Cart {
        self.carts.get(&user_id).cloned().unwrap_or_default()
    }

    /// Set (not increment) the quantity of a product.
    pub fn add_to_cart(
        &mut self,
        user_id: u64,
        product_id: u64,
        quantity: u64,
        added_at: String,
    ) -> Cart {
        let cart = self.carts.entry(user_id).or_default();
        cart.0.insert(
            product_id.to_string(),
            CartItem { quantity, added_at },
        );
        cart.clone()
    }

    pub fn remove_from_cart(&mut self, user_id: u64, product_id: u64) -> Cart {
        match self.carts.get_mut(&user_id) {
            Some(cart) => {
                cart.0.remove(&product_id.to_string());
                cart.clone()
            }
            None => Cart::default(),
        }
    }
}

fn registration_failed(message: &str) -> ApiError {
    ApiError::bad_request("registration_failed", message)
}

/// Register a user. Argon2 runs on the blocking pool with no lock held;
/// the write lock is only taken to insert the account.
pub async fn register_user(
    store: &RwLock<InMemoryStore>,
    username: &str,
    password: &str,
    email: &str,
) -> Result<UserAccount, ApiError> {
    let (username, email) = store.read().await.check_registration(username, email)?;

    let password = Zeroizing::new(password.to_string());
    let password_hash = spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::internal(format!("Password hashing task failed: {e}")))??;

    store.write().await.insert_user(username, email, password_hash)
}

/// Check credentials. The stored hash is copied out under a short read lock
/// and verified on the blocking pool.
pub async fn verify_credentials(
    store: &RwLock<InMemoryStore>,
    username: &str,
    password: &str,
) -> Result<Option<UserAccount>, ApiError> {
    let Some(account) = store.read().await.find_by_username(username).cloned() else {
        return Ok(None);
    };

    let password = Zeroizing::new(password.to_string());
    let stored_hash = account.password_hash.clone();
    let matches = spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| ApiError::internal(format!("Password check task failed: {e}")))?;

    Ok(matches.then_some(account))
}

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| ApiError::internal(format!("Failed to generate salt: {e}")))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {e}")))
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn store_with_alice() -> (InMemoryStore, UserAccount) {
        let mut store = InMemoryStore::new();
        let alice = store
            .create_user("alice", "correct horse", "Alice@Example.com")
            .expect("user creation succeeds");
        (store, alice)
    }

    #[test]
    fn create_user_assigns_sequential_ids() {
        let (mut store, alice) = store_with_alice();
        let bob = store.create_user("bob", "pw", "bob@example.com").unwrap();
        assert_eq!(alice.id, 1);
        assert_eq!(bob.id, 2);
        assert_eq!(alice.email, "alice@example.com");
    }

    #[test]
    fn password_is_not_stored_in_clear() {
        let (store, alice) = store_with_alice();
        let stored = store.user(alice.id).unwrap();
        assert!(stored.password_hash.starts_with("$argon2"));
        assert!(!stored.password_hash.contains("correct horse"));
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let (mut store, _) = store_with_alice();
        let err = store
            .create_user(" alice ", "pw", "other@example.com")
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "registration_failed");
        assert!(err.message.contains("username"));
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let (mut store, _) = store_with_alice();
        let err = store
            .create_user("alice2", "pw", "alice@example.com")
            .unwrap_err();
        assert!(err.message.contains("email"));
    }

    #[test]
    fn invalid_email_is_rejected() {
        let mut store = InMemoryStore::new();
        for email in ["no-at-sign", "@example.com", "a@", "a@b@c"] {
            assert!(store.create_user("x", "pw", email).is_err(), "{email}");
        }
    }

    #[test]
    fn authenticate_checks_password() {
        let (store, alice) = store_with_alice();
        let user = store.authenticate("alice", "correct horse").unwrap();
        assert_eq!(user.id, alice.id);
        assert!(store.authenticate("alice", "wrong").is_none());
        assert!(store.authenticate("nobody", "correct horse").is_none());
    }

    #[test]
    fn insert_rechecks_uniqueness() {
        let mut store = InMemoryStore::new();
        let (username, email) = store.check_registration("carol", "carol@example.com").unwrap();
        let (same_name, other_email) =
            store.check_registration("carol", "c2@example.com").unwrap();

        let hash = hash_password("pw").unwrap();
        store.insert_user(username, email, hash.clone()).unwrap();

        let err = store.insert_user(same_name, other_email, hash).unwrap_err();
        assert_eq!(err.code, "registration_failed");
        assert!(err.message.contains("username"));
    }

    #[test]
    fn verify_password_rejects_garbage_hash() {
        assert!(!verify_password("pw", "not a phc string"));
        let hash = hash_password("pw").unwrap();
        assert!(verify_password("pw", &hash));
        assert!(!verify_password("other", &hash));
    }

    #[tokio::test]
    async fn register_and_verify_through_lock() {
        let store = RwLock::new(InMemoryStore::new());
        let account = register_user(&store, " dave ", "pw", "Dave@Example.com")
            .await
            .unwrap();
        assert_eq!(account.username, "dave");
        assert_eq!(account.email, "dave@example.com");

        let found = verify_credentials(&store, "dave", "pw").await.unwrap();
        assert_eq!(found.map(|a| a.id), Some(account.id));
        assert!(verify_credentials(&store, "dave", "nope").await.unwrap().is_none());
        assert!(verify_credentials(&store, "nobody", "pw").await.unwrap().is_none());

        let err = register_user(&store, "dave", "pw", "d2@example.com")
            .await
            .unwrap_err();
        assert_eq!(err.code, "registration_failed");
    }

    #[tokio::test]
    async fn store_stays_readable_while_hashing() {
        let store = std::sync::Arc::new(RwLock::new(InMemoryStore::new()));
        store.write().await.set_current_token(7, "token".into());

        let registration = tokio::spawn({
            let store = store.clone();
            async move { register_user(&store, "erin", "pw", "erin@example.com").await }
        });
        // let the registration reach the hashing step
        tokio::task::yield_now().await;

        let guard = store
            .try_read()
            .expect("no lock is held while the password is hashed");
        assert!(guard.is_current_token(7, "token"));
        drop(guard);

        let account = registration.await.unwrap().unwrap();
        assert_eq!(account.username, "erin");
    }

    #[test]
    fn sessions_track_one_token_per_user() {
        let (mut store, alice) = store_with_alice();
        store.set_current_token(alice.id, "first".into());
        store.set_current_token(alice.id, "second".into());

        assert!(!store.is_current_token(alice.id, "first"));
        assert!(!store.is_current_token(alice.id, "secon"));
        assert!(!store.is_current_token(alice.id, "second!"));
        assert!(store.is_current_token(alice.id, "second"));

        assert!(store.clear_current_token(alice.id));
        assert!(!store.is_current_token(alice.id, "second"));
        assert!(!store.clear_current_token(alice.id));
    }

    #[test]
    fn cart_lines_are_set_and_removed() {
        let mut store = InMemoryStore::new();
        assert_eq!(store.cart(1), Cart::default());

        store.add_to_cart(1, 12, 2, "2026-01-01 10:00:00".into());
        let cart = store.add_to_cart(1, 12, 5, "2026-01-01 10:05:00".into());
        assert_eq!(cart.0.len(), 1);
        assert_eq!(cart.0["12"].quantity, 5);

        store.add_to_cart(1, 30, 1, "2026-01-01 10:06:00".into());
        let cart = store.remove_from_cart(1, 12);
        assert_eq!(cart.0.keys().collect::<Vec<_>>(), vec!["30"]);

        // other users are unaffected
        assert_eq!(store.cart(2), Cart::default());
        assert_eq!(store.remove_from_cart(2, 30), Cart::default());
    }
}
