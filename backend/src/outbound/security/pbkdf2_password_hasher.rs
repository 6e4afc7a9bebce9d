//! PBKDF2-HMAC-SHA256 password hashing.
//!
//! Hashes are PHC strings (`$pbkdf2-sha256$i=<rounds>,l=32$<salt>$<hash>`),
//! so changing the configured rounds does not invalidate existing accounts.

use std::fmt;

use async_trait::async_trait;
use pbkdf2::password_hash::{
    self, PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use pbkdf2::{Algorithm, Params, Pbkdf2};
use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

const SALT_BYTES: usize = 16;
const HASH_BYTES: usize = 32;

/// Error returned when a configured round count is below the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashRoundsError {
    /// Rejected value.
    pub requested: u32,
}

impl fmt::Display for HashRoundsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "password hash rounds must be at least {}, got {}",
            HashRounds::MIN,
            self.requested
        )
    }
}

impl std::error::Error for HashRoundsError {}

/// PBKDF2 iteration count, never below [`HashRounds::MIN`].
///
/// # Examples
/// ```
/// use chirpy::outbound::security::HashRounds;
///
/// assert_eq!(HashRounds::default().get(), 600_000);
/// assert!(HashRounds::new(1_000).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashRounds(u32);

impl HashRounds {
    /// Lowest accepted iteration count.
    pub const MIN: u32 = 100_000;
    /// Iteration count used when none is configured.
    pub const DEFAULT: u32 = 600_000;

    /// Validate a configured iteration count.
    pub fn new(rounds: u32) -> Result<Self, HashRoundsError> {
        if rounds < Self::MIN {
            return Err(HashRoundsError { requested: rounds });
        }
        Ok(Self(rounds))
    }

    /// Iteration count.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for HashRounds {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// [`PasswordHasher`] adapter running PBKDF2 on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pbkdf2PasswordHasher {
    rounds: HashRounds,
}

impl Pbkdf2PasswordHasher {
    /// Hasher producing new hashes with `rounds` iterations.
    #[must_use]
    pub fn new(rounds: HashRounds) -> Self {
        Self { rounds }
    }
}

fn hash_with_rounds(password: &[u8], rounds: u32) -> Result<PasswordHash, PasswordHashError> {
    let mut salt_bytes = [0_u8; SALT_BYTES];
    OsRng.fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|err| PasswordHashError::hashing(err.to_string()))?;
    let params = Params {
        rounds,
        output_length: HASH_BYTES,
    };
    let hash = Pbkdf2
        .hash_password_customized(
            password,
            Some(Algorithm::Pbkdf2Sha256.ident()),
            None,
            params,
            &salt,
        )
        .map_err(|err| PasswordHashError::hashing(err.to_string()))?;
    Ok(PasswordHash::new(hash.to_string()))
}

fn verify_against(password: &[u8], encoded: &str) -> Result<bool, PasswordHashError> {
    let parsed = PhcHash::new(encoded).map_err(|err| PasswordHashError::malformed(err.to_string()))?;
    if parsed.algorithm != Algorithm::Pbkdf2Sha256.ident() {
        return Err(PasswordHashError::malformed(format!(
            "unexpected algorithm `{}`",
            parsed.algorithm
        )));
    }
    match Pbkdf2.verify_password(password, &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(PasswordHashError::malformed(err.to_string())),
    }
}

async fn run_blocking<T, F>(op: F) -> Result<T, PasswordHashError>
where
    F: FnOnce() -> Result<T, PasswordHashError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|err| PasswordHashError::hashing(err.to_string()))?
}

#[async_trait]
impl PasswordHasher for Pbkdf2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        let rounds = self.rounds.get();
        let password = Zeroizing::new(password.to_owned());
        run_blocking(move || hash_with_rounds(password.as_bytes(), rounds)).await
    }

    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        let encoded = hash.as_str().to_owned();
        run_blocking(move || verify_against(password.as_bytes(), &encoded)).await
    }
}
