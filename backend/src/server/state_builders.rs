//! Builders wiring the record store and security adapters into HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use chirpy::domain::{ChirpService, CredentialService};
use chirpy::inbound::http::state::HttpState;
use chirpy::outbound::persistence::JsonFileStore;
use chirpy::outbound::security::{HmacAccessTokens, Pbkdf2PasswordHasher};

use super::ServerConfig;

/// Open the record store and build the driving ports over it.
///
/// # Errors
/// Returns [`std::io::Error`] when the store path cannot be prepared.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let store = Arc::new(
        JsonFileStore::open(&config.database_path).map_err(std::io::Error::other)?,
    );
    info!(path = %config.database_path.display(), "record store opened");

    let credentials = CredentialService::new(
        Arc::clone(&store),
        Arc::new(Pbkdf2PasswordHasher::new(config.hash_rounds)),
        Arc::new(HmacAccessTokens::new(config.jwt_secret.as_bytes())),
        Arc::new(DefaultClock),
    )
    .with_refresh_ttl(config.refresh_ttl);
    let chirps = Arc::new(ChirpService::new(store));

    Ok(web::Data::new(HttpState::new(
        Arc::new(credentials),
        chirps.clone(),
        chirps,
    )))
}
