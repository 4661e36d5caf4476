//! Staff authentication service
//!
//! Owns the injected pool and composes validation, hashing, and the
//! users repository. `verify_credentials` is the login gate and fails
//! closed: no backend error ever reaches the caller as a success.

use crate::db;
use crate::error::{LibraryError, Result};
use crate::models::{User, UserRole};
use crate::security;
use crate::validators;
use sqlx::SqlitePool;
use tracing::{error, warn};

/// Outcome of a credential check. Deliberately carries no error branch:
/// a lookup failure is indistinguishable from a bad password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialCheck {
    Valid { role: UserRole },
    Invalid,
}

impl CredentialCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, CredentialCheck::Valid { .. })
    }
}

#[derive(Clone)]
pub struct AuthService {
    pool: SqlitePool,
}

impl AuthService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Check a username/password pair against the stored hash.
    ///
    /// Fails closed: unknown username, backend failure, or hash mismatch
    /// all return `Invalid`.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> CredentialCheck {
        let user = match db::users::find_by_username(&self.pool, username).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!(%username, "login attempt for unknown user");
                return CredentialCheck::Invalid;
            }
            Err(e) => {
                error!(%username, error = %e, "credential lookup failed");
                return CredentialCheck::Invalid;
            }
        };

        match security::verify_password(password, &user.password_hash) {
            Ok(true) => CredentialCheck::Valid { role: user.role },
            Ok(false) => {
                warn!(%username, "password mismatch");
                CredentialCheck::Invalid
            }
            Err(e) => {
                error!(%username, error = %e, "password verification failed");
                CredentialCheck::Invalid
            }
        }
    }

    /// Create a staff account with a freshly hashed password
    pub async fn add_user(&self, username: &str, password: &str, role: UserRole) -> Result<User> {
        if !validators::validate_username(username) {
            return Err(LibraryError::Validation(
                "Username must be 3-32 characters (letters, digits, - and _)".to_string(),
            ));
        }

        let password_hash = security::hash_password(password)?;
        db::users::create_user(&self.pool, username, &password_hash, role).await
    }

    /// Re-hash and store a new password for an existing account
    pub async fn update_password(&self, username: &str, new_password: &str) -> Result<()> {
        let password_hash = security::hash_password(new_password)?;
        db::users::update_password(&self.pool, username, &password_hash).await
    }

    /// Remove a staff account
    pub async fn delete_user(&self, username: &str) -> Result<()> {
        db::users::delete_user(&self.pool, username).await
    }

    /// Look up a staff account by username
    pub async fn find_user(&self, username: &str) -> Result<Option<User>> {
        db::users::find_by_username(&self.pool, username).await
    }

    /// All staff accounts for the admin user table
    pub async fn list_users(&self) -> Result<Vec<User>> {
        db::users::list_users(&self.pool).await
    }
}
