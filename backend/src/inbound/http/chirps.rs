//! Chirp handlers.
//!
//! ```text
//! POST /api/chirps          {"body":"I'm the one who knocks!"}  (bearer access token)
//! GET  /api/chirps
//! GET  /api/chirps/{id}
//! POST /api/validate_chirp  {"body":"What a kerfuffle"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Chirp, ChirpBody, ChirpId, Error, map_chirp_validation_error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerToken;
use crate::inbound::http::state::HttpState;

/// Chirp body submitted for creation or validation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ChirpRequest {
    #[schema(example = "What a kerfuffle")]
    pub body: String,
}

/// Validation outcome with the masked body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ValidateChirpResponse {
    pub valid: bool,
    #[schema(example = "What a ****")]
    pub cleaned_body: String,
}

/// Post a chirp as the authenticated user.
#[utoipa::path(
    post,
    path = "/api/chirps",
    request_body = ChirpRequest,
    responses(
        (status = 201, description = "Chirp created", body = Chirp),
        (status = 400, description = "Empty or too long body", body = Error),
        (status = 401, description = "Missing or invalid access token", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["chirps"],
    operation_id = "createChirp",
    security(("bearer" = []))
)]
#[post("/chirps")]
pub async fn create_chirp(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<ChirpRequest>,
) -> ApiResult<HttpResponse> {
    let author = state.credentials.authenticate(token.as_str()).await?;
    let chirp = state.chirps.create(&author, &payload.body).await?;
    Ok(HttpResponse::Created().json(chirp))
}

/// List every chirp in ascending id order.
#[utoipa::path(
    get,
    path = "/api/chirps",
    responses(
        (status = 200, description = "All chirps", body = [Chirp]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["chirps"],
    operation_id = "listChirps",
    security([])
)]
#[get("/chirps")]
pub async fn list_chirps(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Chirp>>> {
    let chirps = state.chirps_query.list().await?;
    Ok(web::Json(chirps))
}

/// Fetch one chirp by id.
#[utoipa::path(
    get,
    path = "/api/chirps/{id}",
    params(("id" = u64, Path, description = "Chirp id")),
    responses(
        (status = 200, description = "The chirp", body = Chirp),
        (status = 400, description = "Id is not a positive integer", body = Error),
        (status = 404, description = "No chirp with this id", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["chirps"],
    operation_id = "getChirp",
    security([])
)]
#[get("/chirps/{id}")]
pub async fn get_chirp(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Chirp>> {
    let id = path
        .parse::<ChirpId>()
        .map_err(map_chirp_validation_error)?;
    let chirp = state.chirps_query.get(&id).await?;
    Ok(web::Json(chirp))
}

/// Check a body against the chirp rules without storing it.
#[utoipa::path(
    post,
    path = "/api/validate_chirp",
    request_body = ChirpRequest,
    responses(
        (status = 200, description = "Body is valid", body = ValidateChirpResponse),
        (status = 400, description = "Empty or too long body", body = Error)
    ),
    tags = ["chirps"],
    operation_id = "validateChirp",
    security([])
)]
#[post("/validate_chirp")]
pub async fn validate_chirp(
    payload: web::Json<ChirpRequest>,
) -> ApiResult<web::Json<ValidateChirpResponse>> {
    let body = ChirpBody::parse(&payload.body).map_err(map_chirp_validation_error)?;
    Ok(web::Json(ValidateChirpResponse {
        valid: true,
        cleaned_body: body.into(),
    }))
}

#[cfg(test)]
#[path = "chirps_tests.rs"]
mod tests;
