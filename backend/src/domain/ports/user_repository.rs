//! Port abstraction for user persistence adapters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Email, PasswordHash, RefreshSession, RefreshToken, User, UserId};

use super::StorePersistenceError;

/// Storage for accounts and their refresh sessions.
///
/// Each user holds at most one refresh token; storing a new one replaces the
/// previous token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Allocate the next user id and persist the account.
    async fn create(
        &self,
        email: &Email,
        password_hash: &PasswordHash,
    ) -> Result<User, StorePersistenceError>;

    /// Fetch the lowest-id account registered under `email`.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, StorePersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StorePersistenceError>;

    /// Replace email and password hash. Returns `None` for unknown users.
    async fn update_credentials(
        &self,
        id: &UserId,
        email: &Email,
        password_hash: &PasswordHash,
    ) -> Result<Option<User>, StorePersistenceError>;

    /// Attach a refresh token to the user. Returns `false` for unknown users.
    async fn store_refresh_token(
        &self,
        id: &UserId,
        token: &RefreshToken,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, StorePersistenceError>;

    /// Locate the session holding exactly `token`.
    async fn find_refresh_session(
        &self,
        token: &RefreshToken,
    ) -> Result<Option<RefreshSession>, StorePersistenceError>;

    /// Clear `token` wherever it is stored. Returns whether anything changed.
    async fn revoke_refresh_token(&self, token: &RefreshToken)
    -> Result<bool, StorePersistenceError>;
}
