//! Domain primitives, ports and services.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! adapters, the ports those adapters plug into, and the services that
//! implement the use-cases. Keep types immutable and document invariants in
//! each type's Rustdoc.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `User`, `UserId`, `Email`, `PasswordHash`: accounts.
//! - `Chirp`, `ChirpId`, `ChirpBody`: posts and body validation.
//! - `Credentials`, tokens and lifetimes: the session model.
//! - `CredentialService`, `ChirpService`: driving port implementations.

pub mod auth;
pub mod chirp;
mod chirp_service;
mod credential_service;
pub mod error;
pub mod ports;
mod trace_id;
pub mod user;

pub use self::auth::{
    AccessClaims, AccessToken, AccessTokenTtl, Credentials, LoginGrant, LoginValidationError,
    REFRESH_TOKEN_BYTES, RefreshSession, RefreshToken, RefreshTokenTtl, TOKEN_ISSUER,
};
pub use self::chirp::{Chirp, ChirpBody, ChirpId, ChirpValidationError, MAX_CHIRP_LENGTH};
pub use self::chirp_service::{ChirpService, map_chirp_validation_error};
pub use self::credential_service::CredentialService;
pub use self::error::{Error, ErrorCode};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Email, PasswordHash, User, UserId, UserProfile, UserValidationError};

/// Convenient domain result alias.
///
/// # Examples
/// ```
/// use chirpy::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<u64> {
///     Err(Error::not_found("nope"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
