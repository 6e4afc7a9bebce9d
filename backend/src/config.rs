//! Service configuration loaded via OrthoConfig.
//!
//! Values merge from CLI flags, `CHIRPY_*` environment variables and config
//! files. Every field is optional at load time; accessors apply defaults and
//! validate, so a bad value is reported once at startup.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::RefreshTokenTtl;
use crate::outbound::security::{HashRounds, HashRoundsError};

/// Address bound when none is configured.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
/// Record store location when none is configured.
pub const DEFAULT_DATABASE_PATH: &str = "database.json";

/// Startup configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No access token signing secret was supplied.
    #[error("jwt_secret is required (set CHIRPY_JWT_SECRET)")]
    MissingSecret,
    /// The bind address is not `host:port`.
    #[error("invalid bind_address `{value}`: {source}")]
    InvalidBindAddress {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// Password hash rounds are below the floor.
    #[error(transparent)]
    HashRounds(#[from] HashRoundsError),
    /// Refresh token lifetime is outside `1..=RefreshTokenTtl::MAX_DAYS`.
    #[error(
        "refresh_token_ttl_days must be between 1 and {max}, got {days}",
        max = RefreshTokenTtl::MAX_DAYS
    )]
    RefreshTtlOutOfRange { days: u32 },
}

/// Raw settings for the Chirpy server.
#[derive(Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CHIRPY")]
pub struct ChirpySettings {
    /// Socket address to listen on.
    pub bind_address: Option<String>,
    /// Path of the JSON record store.
    pub database_path: Option<PathBuf>,
    /// Shared secret signing access tokens.
    pub jwt_secret: Option<String>,
    /// PBKDF2 iterations for new password hashes.
    pub password_hash_rounds: Option<u32>,
    /// Refresh token lifetime in days.
    pub refresh_token_ttl_days: Option<u32>,
}

impl ChirpySettings {
    /// Configured listen address, or [`DEFAULT_BIND_ADDRESS`].
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        let value = self.bind_address.as_deref().unwrap_or(DEFAULT_BIND_ADDRESS);
        value
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddress {
                value: value.to_owned(),
                source,
            })
    }

    /// Configured store path, or [`DEFAULT_DATABASE_PATH`].
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH))
    }

    /// Signing secret; blank values count as missing.
    pub fn jwt_secret(&self) -> Result<&str, ConfigError> {
        self.jwt_secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
            .ok_or(ConfigError::MissingSecret)
    }

    /// Validated PBKDF2 iteration count.
    pub fn password_hash_rounds(&self) -> Result<HashRounds, ConfigError> {
        match self.password_hash_rounds {
            Some(rounds) => Ok(HashRounds::new(rounds)?),
            None => Ok(HashRounds::default()),
        }
    }

    /// Validated refresh token lifetime.
    pub fn refresh_token_ttl(&self) -> Result<RefreshTokenTtl, ConfigError> {
        match self.refresh_token_ttl_days {
            Some(days) => RefreshTokenTtl::from_days(days)
                .ok_or(ConfigError::RefreshTtlOutOfRange { days }),
            None => Ok(RefreshTokenTtl::default()),
        }
    }
}

impl fmt::Debug for ChirpySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChirpySettings")
            .field("bind_address", &self.bind_address)
            .field("database_path", &self.database_path)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| ".."))
            .field("password_hash_rounds", &self.password_hash_rounds)
            .field("refresh_token_ttl_days", &self.refresh_token_ttl_days)
            .finish()
    }
}
