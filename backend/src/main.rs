//! Chirpy entry-point: loads configuration and serves the REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use chirpy::config::ChirpySettings;
use chirpy::inbound::http::health::HealthState;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ChirpySettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let config = ServerConfig::from_settings(&settings).map_err(std::io::Error::other)?;
    info!(bind_addr = %config.bind_addr(), "starting chirpy");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
