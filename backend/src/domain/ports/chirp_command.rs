//! Driving port for creating chirps.

use async_trait::async_trait;

use crate::domain::{Chirp, Error, UserId};

/// Domain use-case port for posting chirps.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChirpCommand: Send + Sync {
    /// Validate `raw_body` and persist it as a chirp by `author`.
    ///
    /// Rejected bodies are never persisted.
    async fn create(&self, author: &UserId, raw_body: &str) -> Result<Chirp, Error>;
}
