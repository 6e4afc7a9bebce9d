//! Port abstraction for chirp persistence adapters.

use async_trait::async_trait;

use crate::domain::{Chirp, ChirpBody, ChirpId, UserId};

use super::StorePersistenceError;

/// Storage for chirps. Chirps are immutable once created.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChirpRepository: Send + Sync {
    /// Allocate the next chirp id and persist the chirp.
    async fn create(&self, author: &UserId, body: &ChirpBody)
    -> Result<Chirp, StorePersistenceError>;

    /// All chirps in ascending id order.
    async fn list(&self) -> Result<Vec<Chirp>, StorePersistenceError>;

    /// Fetch a chirp by identifier.
    async fn find_by_id(&self, id: &ChirpId) -> Result<Option<Chirp>, StorePersistenceError>;
}
