//! Credential and session lifecycle service.
//!
//! Implements [`CredentialManager`] on top of the user repository, a password
//! hasher and an access token codec. Refresh sessions follow
//! `NoSession -> Active -> NoSession`: login replaces any previous token,
//! refresh leaves it untouched and revoke clears it. Expired sessions stay on
//! record but can no longer be refreshed.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error, info};

use crate::domain::ports::{
    AccessTokenCodec, CredentialManager, PasswordHashError, PasswordHasher, StorePersistenceError,
    TokenError, UserRepository,
};
use crate::domain::{
    AccessClaims, AccessToken, AccessTokenTtl, Credentials, Error, LoginGrant, RefreshToken,
    RefreshTokenTtl, UserId, UserProfile,
};

const INVALID_CREDENTIALS: &str = "Incorrect email or password";
const INVALID_TOKEN: &str = "invalid or expired token";

/// Credential service implementing the [`CredentialManager`] driving port.
#[derive(Clone)]
pub struct CredentialService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
    refresh_ttl: RefreshTokenTtl,
}

impl<U, H, T> CredentialService<U, H, T> {
    /// Create a service with the default refresh token lifetime.
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
            refresh_ttl: RefreshTokenTtl::default(),
        }
    }

    /// Override the refresh token lifetime.
    #[must_use]
    pub fn with_refresh_ttl(mut self, refresh_ttl: RefreshTokenTtl) -> Self {
        self.refresh_ttl = refresh_ttl;
        self
    }
}

impl<U, H, T> CredentialService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: AccessTokenCodec,
{
    fn mint_access_token(&self, subject: UserId, ttl: AccessTokenTtl) -> Result<AccessToken, Error> {
        let claims = AccessClaims::new(subject, self.clock.utc(), ttl);
        self.tokens.issue(&claims).map_err(|err| {
            error!(error = %err, user_id = %subject, "access token issue failed");
            Error::internal(format!("failed to issue access token: {err}"))
        })
    }
}

fn map_store_error(err: StorePersistenceError) -> Error {
    error!(error = %err, "user repository failure");
    Error::internal(err.to_string())
}

fn map_hash_error(err: PasswordHashError) -> Error {
    error!(error = %err, "password hasher failure");
    Error::internal(err.to_string())
}

fn map_token_error(err: &TokenError) -> Error {
    debug!(error = %err, "access token rejected");
    Error::unauthorized(INVALID_TOKEN)
}

#[async_trait]
impl<U, H, T> CredentialManager for CredentialService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: AccessTokenCodec,
{
    async fn register(&self, credentials: &Credentials) -> Result<UserProfile, Error> {
        let hash = self
            .hasher
            .hash(credentials.password())
            .await
            .map_err(map_hash_error)?;
        let user = self
            .users
            .create(credentials.email(), &hash)
            .await
            .map_err(map_store_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(user.profile())
    }

    async fn login(
        &self,
        credentials: &Credentials,
        expires_in_seconds: Option<i64>,
    ) -> Result<LoginGrant, Error> {
        let found = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_store_error)?;

        let Some(user) = found else {
            // Spend the same hashing work as a real verification.
            self.hasher
                .hash(credentials.password())
                .await
                .map_err(map_hash_error)?;
            debug!("login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .await
            .map_err(map_hash_error)?;
        if !matches {
            debug!("login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let access_token =
            self.mint_access_token(user.id(), AccessTokenTtl::from_requested(expires_in_seconds))?;
        let refresh_token = RefreshToken::generate();
        let expires_at = self
            .clock
            .utc()
            .checked_add_signed(self.refresh_ttl.as_duration())
            .ok_or_else(|| {
                error!(user_id = %user.id(), "refresh token expiry out of range");
                Error::internal("refresh token expiry out of range")
            })?;
        let stored = self
            .users
            .store_refresh_token(&user.id(), &refresh_token, expires_at)
            .await
            .map_err(map_store_error)?;
        if !stored {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        info!(user_id = %user.id(), "user logged in");
        Ok(LoginGrant {
            profile: user.profile(),
            access_token,
            refresh_token,
        })
    }

    async fn refresh(&self, token: &RefreshToken) -> Result<AccessToken, Error> {
        let session = self
            .users
            .find_refresh_session(token)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_TOKEN))?;
        if !session.is_active_at(self.clock.utc()) {
            debug!(user_id = %session.user_id, "refresh token expired");
            return Err(Error::unauthorized(INVALID_TOKEN));
        }
        self.mint_access_token(session.user_id, AccessTokenTtl::default())
    }

    async fn revoke(&self, token: &RefreshToken) -> Result<(), Error> {
        let revoked = self
            .users
            .revoke_refresh_token(token)
            .await
            .map_err(map_store_error)?;
        debug!(revoked, "refresh token revocation processed");
        Ok(())
    }

    async fn authenticate(&self, access_token: &str) -> Result<UserId, Error> {
        self.tokens
            .verify(access_token, self.clock.utc())
            .map(|claims| claims.subject)
            .map_err(|err| map_token_error(&err))
    }

    async fn update_credentials(
        &self,
        user_id: &UserId,
        credentials: &Credentials,
    ) -> Result<UserProfile, Error> {
        if self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_store_error)?
            .is_none()
        {
            return Err(Error::unauthorized(INVALID_TOKEN));
        }
        let hash = self
            .hasher
            .hash(credentials.password())
            .await
            .map_err(map_hash_error)?;
        let user = self
            .users
            .update_credentials(user_id, credentials.email(), &hash)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_TOKEN))?;
        info!(user_id = %user.id(), "user credentials updated");
        Ok(user.profile())
    }
}

#[cfg(test)]
#[path = "credential_service_tests.rs"]
mod tests;
