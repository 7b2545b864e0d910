//! Authentication service
//!
//! Registration and login against the `users` table. Credentials are hashed
//! with Argon2id; login never reveals whether the username exists.

use tracing::{info, warn};

use crate::audit::EntityType;
use crate::crypto::{hash_password, verify_password, PasswordHashParams};
use crate::error::{FinanceError, FinanceResult};
use crate::models::{normalize_username, UserId};
use crate::storage::Storage;

/// Service for user registration and login
pub struct AuthService<'a> {
    storage: &'a Storage,
    params: &'a PasswordHashParams,
}

impl<'a> AuthService<'a> {
    pub fn new(storage: &'a Storage, params: &'a PasswordHashParams) -> Self {
        Self { storage, params }
    }

    /// Create a new user
    ///
    /// Fails with `DuplicateUsername` when the name is taken and
    /// `InvalidInput` when either field is empty.
    pub fn register(&self, username: &str, password: &str) -> FinanceResult<()> {
        let username = normalize_username(username)
            .map_err(|msg| FinanceError::InvalidInput(msg.to_string()))?;
        if password.is_empty() {
            return Err(FinanceError::InvalidInput("password cannot be empty".into()));
        }

        if self.storage.users().find_by_username(&username)?.is_some() {
            return Err(FinanceError::DuplicateUsername(username));
        }

        let hash = hash_password(password, self.params)?;
        let user = self.storage.users().insert(&username, &hash)?;

        self.storage
            .log_create(EntityType::User, user.id.tagged(), None, &user);
        info!(user_id = %user.id, username = %user.username, "registered user");

        Ok(())
    }

    /// Verify credentials and return the user's id
    pub fn login(&self, username: &str, password: &str) -> FinanceResult<UserId> {
        let Some(user) = self.storage.users().find_by_username(username.trim())? else {
            warn!("login failed: unknown username");
            return Err(FinanceError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "login failed: wrong password");
            return Err(FinanceError::InvalidCredentials);
        }

        info!(user_id = %user.id, "user logged in");
        Ok(user.id)
    }
}
