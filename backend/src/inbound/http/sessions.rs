//! Session lifecycle handlers.
//!
//! ```text
//! POST /api/login   {"email":"walt@breakingbad.com","password":"04234","expires_in_seconds":60}
//! POST /api/refresh Authorization: Bearer <refresh token>
//! POST /api/revoke  Authorization: Bearer <refresh token>
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Credentials, Error, RefreshToken};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerToken;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::map_credentials_error;

/// Login request body.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "walt@breakingbad.com")]
    pub email: String,
    #[schema(example = "04234")]
    pub password: String,
    /// Requested access token lifetime; capped at one hour.
    #[serde(default)]
    #[schema(example = 3600)]
    pub expires_in_seconds: Option<i64>,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"..")
            .field("expires_in_seconds", &self.expires_in_seconds)
            .finish()
    }
}

/// Successful login: the profile plus both tokens.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginResponse {
    pub id: u64,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Fresh access token minted from a refresh token.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Exchange credentials for an access token and a refresh token.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Incorrect email or password", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["sessions"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let LoginRequest {
        email,
        password,
        expires_in_seconds,
    } = payload.into_inner();
    let credentials =
        Credentials::try_from_parts(&email, &password).map_err(map_credentials_error)?;
    let grant = state
        .credentials
        .login(&credentials, expires_in_seconds)
        .await?;
    Ok(web::Json(LoginResponse {
        id: grant.profile.id.get(),
        email: grant.profile.email.into(),
        access_token: grant.access_token.into_inner(),
        refresh_token: grant.refresh_token.into_inner(),
    }))
}

/// Mint a new access token from the bearer refresh token.
#[utoipa::path(
    post,
    path = "/api/refresh",
    responses(
        (status = 200, description = "New access token", body = RefreshResponse),
        (status = 401, description = "Missing, unknown, revoked or expired refresh token", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["sessions"],
    operation_id = "refresh",
    security(("bearer" = []))
)]
#[post("/refresh")]
pub async fn refresh(
    state: web::Data<HttpState>,
    token: BearerToken,
) -> ApiResult<web::Json<RefreshResponse>> {
    let refresh_token = RefreshToken::new(token.into_inner());
    let access_token = state.credentials.refresh(&refresh_token).await?;
    Ok(web::Json(RefreshResponse {
        access_token: access_token.into_inner(),
    }))
}

/// Revoke the bearer refresh token. Unknown tokens are accepted silently.
#[utoipa::path(
    post,
    path = "/api/revoke",
    responses(
        (status = 204, description = "Token revoked or already unknown"),
        (status = 401, description = "Missing bearer token", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["sessions"],
    operation_id = "revoke",
    security(("bearer" = []))
)]
#[post("/revoke")]
pub async fn revoke(state: web::Data<HttpState>, token: BearerToken) -> ApiResult<HttpResponse> {
    let refresh_token = RefreshToken::new(token.into_inner());
    state.credentials.revoke(&refresh_token).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "sessions_tests.rs"]
mod tests;
