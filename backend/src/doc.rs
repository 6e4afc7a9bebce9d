//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api` handler, the request and response
//! schemas, and the bearer token security scheme. The document backs Swagger
//! UI in debug builds and the `openapi-dump` binary.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Chirp, Error, ErrorCode, UserProfile};
use crate::inbound::http::chirps::{ChirpRequest, ValidateChirpResponse};
use crate::inbound::http::sessions::{LoginRequest, LoginResponse, RefreshResponse};
use crate::inbound::http::users::CredentialsRequest;

/// Name of the bearer security scheme referenced by handlers.
pub const BEARER_SCHEME: &str = "bearer";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Access token from POST /api/login, or a refresh token for \
                         /api/refresh and /api/revoke.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Chirpy API",
        description = "Micro-blog service with token sessions.",
        license(name = "ISC", url = "https://opensource.org/license/isc-license-txt")
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    paths(
        crate::inbound::http::health::healthz,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::sessions::login,
        crate::inbound::http::sessions::refresh,
        crate::inbound::http::sessions::revoke,
        crate::inbound::http::chirps::create_chirp,
        crate::inbound::http::chirps::list_chirps,
        crate::inbound::http::chirps::get_chirp,
        crate::inbound::http::chirps::validate_chirp,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserProfile,
        Chirp,
        CredentialsRequest,
        LoginRequest,
        LoginResponse,
        RefreshResponse,
        ChirpRequest,
        ValidateChirpResponse,
    )),
    tags(
        (name = "users", description = "Account registration and updates"),
        (name = "sessions", description = "Login, refresh and revocation"),
        (name = "chirps", description = "Posting and reading chirps"),
        (name = "health", description = "Readiness probe")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn object_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name).expect("schema registered") {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            other => panic!("expected object schema for {name}, got {other:?}"),
        }
    }

    #[rstest]
    #[case("Error", &["code", "message", "traceId", "details"])]
    #[case("Chirp", &["id", "body", "author_id"])]
    #[case("UserProfile", &["id", "email"])]
    #[case("LoginResponse", &["id", "email", "access_token", "refresh_token"])]
    fn schemas_expose_wire_fields(#[case] name: &str, #[case] fields: &[&str]) {
        let present = object_fields(name);
        for field in fields {
            assert!(present.iter().any(|f| f == field), "{name} lacks {field}");
        }
    }

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/api/healthz",
            "/api/users",
            "/api/login",
            "/api/refresh",
            "/api/revoke",
            "/api/chirps",
            "/api/chirps/{id}",
            "/api/validate_chirp",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key(BEARER_SCHEME));
    }
}
