//! Driving port for registration and the session lifecycle.
//!
//! Inbound adapters call this port without knowing how passwords are hashed,
//! tokens signed or users stored, which keeps handler tests deterministic.

use async_trait::async_trait;

use crate::domain::{
    AccessToken, Credentials, Error, LoginGrant, RefreshToken, UserId, UserProfile,
};

/// Domain use-case port for account credentials and sessions.
///
/// Every authentication failure is reported as the same generic
/// [`crate::domain::ErrorCode::Unauthorized`] error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialManager: Send + Sync {
    /// Create an account, storing only the password hash.
    async fn register(&self, credentials: &Credentials) -> Result<UserProfile, Error>;

    /// Verify credentials and mint an access token plus a refresh token.
    ///
    /// `expires_in_seconds` is the client's requested access token lifetime.
    async fn login(
        &self,
        credentials: &Credentials,
        expires_in_seconds: Option<i64>,
    ) -> Result<LoginGrant, Error>;

    /// Exchange a live refresh token for a fresh access token.
    async fn refresh(&self, token: &RefreshToken) -> Result<AccessToken, Error>;

    /// Clear a refresh token. Unknown tokens are ignored.
    async fn revoke(&self, token: &RefreshToken) -> Result<(), Error>;

    /// Validate an access token and return its subject.
    async fn authenticate(&self, access_token: &str) -> Result<UserId, Error>;

    /// Replace the acting user's email and password.
    async fn update_credentials(
        &self,
        user_id: &UserId,
        credentials: &Credentials,
    ) -> Result<UserProfile, Error>;
}
