//! Bearer token extraction for authenticated endpoints.
//!
//! The extractor only parses the `Authorization` header; handlers decide
//! whether the token is an access token or a refresh token and hand it to the
//! matching [`crate::domain::ports::CredentialManager`] operation.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::Error;

const BEARER_SCHEME: &str = "Bearer";
const REJECTION_MESSAGE: &str = "invalid or expired token";

/// Raw token taken from `Authorization: Bearer <token>`.
///
/// Missing, non-UTF-8, wrongly prefixed or empty headers are rejected with
/// `401 Unauthorized`.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Token text without the scheme prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume into the token text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(..)")
    }
}

/// Parse an `Authorization` header value.
///
/// The scheme is matched case-insensitively; the token must be non-empty once
/// surrounding whitespace is removed.
///
/// # Examples
/// ```
/// use chirpy::inbound::http::auth::parse_bearer;
///
/// assert_eq!(parse_bearer("Bearer abc").map(|t| t.into_inner()), Some("abc".into()));
/// assert!(parse_bearer("Basic abc").is_none());
/// assert!(parse_bearer("Bearer   ").is_none());
/// ```
#[must_use]
pub fn parse_bearer(header: &str) -> Option<BearerToken> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| BearerToken(token.to_owned()))
}

fn extract(req: &HttpRequest) -> Result<BearerToken, Error> {
    let Some(value) = req.headers().get(AUTHORIZATION) else {
        debug!("request without authorization header");
        return Err(Error::unauthorized(REJECTION_MESSAGE));
    };
    value
        .to_str()
        .ok()
        .and_then(parse_bearer)
        .ok_or_else(|| {
            debug!("authorization header is not a bearer token");
            Error::unauthorized(REJECTION_MESSAGE)
        })
}

impl FromRequest for BearerToken {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}
