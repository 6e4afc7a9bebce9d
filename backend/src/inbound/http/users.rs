//! Account handlers.
//!
//! ```text
//! POST /api/users {"email":"walt@breakingbad.com","password":"04234"}
//! PUT  /api/users {"email":"walter@breakingbad.com","password":"losPollos"}
//! ```

use actix_web::{HttpResponse, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Credentials, Error, LoginValidationError, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerToken;
use crate::inbound::http::state::HttpState;

/// Email and password pair for registration and account updates.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct CredentialsRequest {
    #[schema(example = "walt@breakingbad.com")]
    pub email: String,
    #[schema(example = "04234")]
    pub password: String,
}

impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("email", &self.email)
            .field("password", &"..")
            .finish()
    }
}

impl TryFrom<CredentialsRequest> for Credentials {
    type Error = LoginValidationError;

    fn try_from(value: CredentialsRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Map credential payload failures to a client error naming the field.
pub(crate) fn map_credentials_error(err: LoginValidationError) -> Error {
    let (field, code) = match err {
        LoginValidationError::EmptyEmail => ("email", "empty_email"),
        LoginValidationError::EmptyPassword => ("password", "empty_password"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = UserProfile),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security([])
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        Credentials::try_from(payload.into_inner()).map_err(map_credentials_error)?;
    let profile = state.credentials.register(&credentials).await?;
    Ok(HttpResponse::Created().json(profile))
}

/// Replace the authenticated user's email and password.
#[utoipa::path(
    put,
    path = "/api/users",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Account updated", body = UserProfile),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing or invalid access token", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser",
    security(("bearer" = []))
)]
#[put("/users")]
pub async fn update_user(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let user_id = state.credentials.authenticate(token.as_str()).await?;
    let credentials =
        Credentials::try_from(payload.into_inner()).map_err(map_credentials_error)?;
    let profile = state
        .credentials
        .update_credentials(&user_id, &credentials)
        .await?;
    Ok(web::Json(profile))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
