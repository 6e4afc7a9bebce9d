//! JSON body extraction settings shared by every handler.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, web};
use serde_json::json;
use tracing::debug;

use crate::domain::Error;

/// Largest JSON body accepted, in bytes.
pub const MAX_JSON_BYTES: usize = 16 * 1024;

fn payload_error_code(err: &JsonPayloadError) -> &'static str {
    match err {
        JsonPayloadError::ContentType => "unsupported_content_type",
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "payload_too_large"
        }
        JsonPayloadError::Deserialize(_) => "invalid_json",
        _ => "invalid_payload",
    }
}

/// Map body extraction failures to `400 invalid_request` responses using the
/// shared error schema.
fn handle_payload_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let code = payload_error_code(&err);
    debug!(error = %err, code, "rejected JSON payload");
    Error::invalid_request("request body is not valid JSON for this endpoint")
        .with_details(json!({ "code": code }))
        .into()
}

/// Extractor configuration registered as app data.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use chirpy::inbound::http::payload::json_config;
///
/// let _app = App::new().app_data(json_config());
/// ```
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_BYTES)
        .error_handler(handle_payload_error)
}
