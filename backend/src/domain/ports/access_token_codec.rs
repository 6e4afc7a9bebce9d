//! Port for issuing and verifying signed access tokens.

use chrono::{DateTime, Utc};

use crate::domain::{AccessClaims, AccessToken};

use super::define_port_error;

define_port_error! {
    /// Reasons a token could not be issued or accepted.
    pub enum TokenError {
        /// The token is not three base64url segments of valid JSON.
        Malformed { message: String } => "access token is malformed: {message}",
        /// The header names an algorithm other than the configured one.
        UnsupportedAlgorithm { algorithm: String } =>
            "access token algorithm {algorithm} is not accepted",
        /// The signature does not match the payload.
        BadSignature => "access token signature mismatch",
        /// The issuer claim is missing or foreign.
        WrongIssuer => "access token issuer mismatch",
        /// The token is past its expiry.
        Expired => "access token expired",
        /// Claims could not be encoded.
        Encoding { message: String } => "access token encoding failed: {message}",
    }
}

/// Stateless access token signer and verifier.
#[cfg_attr(test, mockall::automock)]
pub trait AccessTokenCodec: Send + Sync {
    /// Sign `claims` into a compact token.
    fn issue(&self, claims: &AccessClaims) -> Result<AccessToken, TokenError>;

    /// Verify signature, algorithm, issuer and expiry relative to `now`.
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, TokenError>;
}
