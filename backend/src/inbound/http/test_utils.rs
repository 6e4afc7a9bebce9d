//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, web};

use crate::Trace;
use crate::domain::ports::{MockChirpCommand, MockChirpQuery, MockCredentialManager};
use crate::domain::{Email, UserId, UserProfile};
use crate::inbound::http::configure_api;
use crate::inbound::http::health::HealthState;
use crate::inbound::http::payload::json_config;
use crate::inbound::http::state::HttpState;

/// Mocked driving ports; unset expectations fail the test when called.
#[derive(Default)]
pub struct MockPorts {
    pub credentials: MockCredentialManager,
    pub chirps: MockChirpCommand,
    pub chirps_query: MockChirpQuery,
}

impl MockPorts {
    /// Freeze the mocks into handler state.
    pub fn into_state(self) -> HttpState {
        HttpState::new(
            Arc::new(self.credentials),
            Arc::new(self.chirps),
            Arc::new(self.chirps_query),
        )
    }
}

/// Build the full API with `ports`, the trace middleware and a ready health
/// state.
pub fn test_app(
    ports: MockPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let health = HealthState::new();
    health.mark_ready();
    App::new()
        .wrap(Trace)
        .app_data(web::Data::new(ports.into_state()))
        .app_data(web::Data::new(health))
        .app_data(json_config())
        .configure(configure_api)
}

/// `Authorization` header carrying `token` as a bearer credential.
pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

/// Profile fixture.
pub fn profile(id: u64, email: &str) -> UserProfile {
    UserProfile {
        id: UserId::new(id).expect("positive id"),
        email: Email::new(email).expect("valid email"),
    }
}
