//! HTTP inbound adapter exposing the JSON API under `/api`.

pub mod auth;
pub mod chirps;
pub mod error;
pub mod health;
pub mod payload;
pub mod sessions;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::web;

pub use error::ApiResult;

/// Register every API route under the `/api` scope.
///
/// Handlers expect [`state::HttpState`] and [`health::HealthState`] as app
/// data, plus [`payload::json_config`] for consistent body errors.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use chirpy::inbound::http::configure_api;
///
/// let _app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::healthz)
            .service(users::create_user)
            .service(users::update_user)
            .service(sessions::login)
            .service(sessions::refresh)
            .service(sessions::revoke)
            .service(chirps::create_chirp)
            .service(chirps::list_chirps)
            .service(chirps::get_chirp)
            .service(chirps::validate_chirp),
    );
}
