//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ChirpCommand, ChirpQuery, CredentialManager};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration and session lifecycle.
    pub credentials: Arc<dyn CredentialManager>,
    /// Chirp creation.
    pub chirps: Arc<dyn ChirpCommand>,
    /// Chirp reads.
    pub chirps_query: Arc<dyn ChirpQuery>,
}

impl HttpState {
    /// Bundle the driving ports.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use chirpy::domain::ports::{ChirpCommand, ChirpQuery, CredentialManager};
    /// use chirpy::inbound::http::state::HttpState;
    ///
    /// fn build(
    ///     credentials: Arc<dyn CredentialManager>,
    ///     chirps: Arc<dyn ChirpCommand>,
    ///     chirps_query: Arc<dyn ChirpQuery>,
    /// ) -> HttpState {
    ///     HttpState::new(credentials, chirps, chirps_query)
    /// }
    /// ```
    pub fn new(
        credentials: Arc<dyn CredentialManager>,
        chirps: Arc<dyn ChirpCommand>,
        chirps_query: Arc<dyn ChirpQuery>,
    ) -> Self {
        Self {
            credentials,
            chirps,
            chirps_query,
        }
    }
}
