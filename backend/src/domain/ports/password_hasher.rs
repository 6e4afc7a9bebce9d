//! Port for password hashing.
//!
//! Hashing is deliberately slow; adapters move the work off the async
//! executor.

use async_trait::async_trait;

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashers.
    pub enum PasswordHashError {
        /// The hashing primitive failed or its task was cancelled.
        Hashing { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be decoded.
        Malformed { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Salted, slow password hashing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh salt.
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Check `password` against `hash` in constant time.
    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError>;
}
