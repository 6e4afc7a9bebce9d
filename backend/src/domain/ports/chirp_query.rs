//! Driving port for reading chirps.

use async_trait::async_trait;

use crate::domain::{Chirp, ChirpId, Error};

/// Domain use-case port for reading chirps.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChirpQuery: Send + Sync {
    /// All chirps in ascending id order.
    async fn list(&self) -> Result<Vec<Chirp>, Error>;

    /// One chirp, or a not-found error.
    async fn get(&self, id: &ChirpId) -> Result<Chirp, Error>;
}
