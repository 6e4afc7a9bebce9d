//! HTTP server configuration object and helpers.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use zeroize::Zeroizing;

use chirpy::config::{ChirpySettings, ConfigError};
use chirpy::domain::RefreshTokenTtl;
use chirpy::outbound::security::HashRounds;

/// Validated configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) database_path: PathBuf,
    pub(crate) jwt_secret: Zeroizing<String>,
    pub(crate) hash_rounds: HashRounds,
    pub(crate) refresh_ttl: RefreshTokenTtl,
}

impl ServerConfig {
    /// Validate loaded settings, applying defaults for anything unset.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the secret is missing or a value is out
    /// of range.
    pub fn from_settings(settings: &ChirpySettings) -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: settings.bind_address()?,
            database_path: settings.database_path(),
            jwt_secret: Zeroizing::new(settings.jwt_secret()?.to_owned()),
            hash_rounds: settings.password_hash_rounds()?,
            refresh_ttl: settings.refresh_token_ttl()?,
        })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database_path", &self.database_path)
            .field("jwt_secret", &"..")
            .field("hash_rounds", &self.hash_rounds.get())
            .field("refresh_ttl_days", &self.refresh_ttl.days())
            .finish()
    }
}
