//! Chirp domain service implementing the chirp driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info};

use crate::domain::ports::{ChirpCommand, ChirpQuery, ChirpRepository, StorePersistenceError};
use crate::domain::{Chirp, ChirpBody, ChirpId, ChirpValidationError, Error, UserId};

/// Chirp service backed by a [`ChirpRepository`].
#[derive(Clone)]
pub struct ChirpService<R> {
    chirps: Arc<R>,
}

impl<R> ChirpService<R> {
    /// Create a new service over `chirps`.
    pub fn new(chirps: Arc<R>) -> Self {
        Self { chirps }
    }
}

/// Map body validation failures to a client error.
pub fn map_chirp_validation_error(err: ChirpValidationError) -> Error {
    match err {
        ChirpValidationError::EmptyBody => Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "body", "code": "empty_body" })),
        ChirpValidationError::TooLong { max, actual } => Error::invalid_request(err.to_string())
            .with_details(json!({
                "field": "body",
                "code": "too_long",
                "max": max,
                "actual": actual,
            })),
        ChirpValidationError::InvalidId => Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "id", "code": "invalid_id" })),
    }
}

fn map_store_error(err: StorePersistenceError) -> Error {
    error!(error = %err, "chirp repository failure");
    Error::internal(err.to_string())
}

#[async_trait]
impl<R> ChirpCommand for ChirpService<R>
where
    R: ChirpRepository,
{
    async fn create(&self, author: &UserId, raw_body: &str) -> Result<Chirp, Error> {
        let body = ChirpBody::parse(raw_body).map_err(map_chirp_validation_error)?;
        let chirp = self
            .chirps
            .create(author, &body)
            .await
            .map_err(map_store_error)?;
        info!(chirp_id = %chirp.id, author_id = %author, "chirp created");
        Ok(chirp)
    }
}

#[async_trait]
impl<R> ChirpQuery for ChirpService<R>
where
    R: ChirpRepository,
{
    async fn list(&self) -> Result<Vec<Chirp>, Error> {
        self.chirps.list().await.map_err(map_store_error)
    }

    async fn get(&self, id: &ChirpId) -> Result<Chirp, Error> {
        self.chirps
            .find_by_id(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("chirp {id} not found")))
    }
}
