//! Authentication primitives: credentials, tokens and their lifetimes.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use super::{Email, UserId, UserProfile, UserValidationError};

/// Issuer claim stamped into and required from every access token.
pub const TOKEN_ISSUER: &str = "chirpy";

/// Number of random bytes behind a refresh token.
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

impl From<UserValidationError> for LoginValidationError {
    fn from(_: UserValidationError) -> Self {
        Self::EmptyEmail
    }
}

/// Validated email/password pair used for registration, login and updates.
///
/// ## Invariants
/// - `email` is trimmed and non-empty.
/// - `password` is non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use chirpy::domain::Credentials;
///
/// let creds = Credentials::try_from_parts(" walt@example.com ", "04234").unwrap();
/// assert_eq!(creds.email().as_str(), "walt@example.com");
/// assert_eq!(creds.password(), "04234");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: Email,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = Email::new(email)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for lookups.
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Plaintext password supplied by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"..")
            .finish()
    }
}

/// Signed, self-contained access token in compact serialisation.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap an encoded token.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume into the encoded text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// Opaque refresh token, compared by exact match against stored values.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Mint a token from [`REFRESH_TOKEN_BYTES`] bytes of OS randomness,
    /// hex encoded.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0_u8; REFRESH_TOKEN_BYTES]);
        OsRng.fill_bytes(bytes.as_mut_slice());
        Self(hex::encode(bytes.as_slice()))
    }

    /// Wrap a token presented by a client or read from the store.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Token text.
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

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RefreshToken(..)")
    }
}

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessClaims {
    pub issuer: String,
    pub subject: UserId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AccessClaims {
    /// Claims for `subject` issued at `now` and living for `ttl`.
    #[must_use]
    pub fn new(subject: UserId, now: DateTime<Utc>, ttl: AccessTokenTtl) -> Self {
        Self {
            issuer: TOKEN_ISSUER.to_owned(),
            subject,
            issued_at: now,
            expires_at: now + ttl.as_duration(),
        }
    }
}

/// Access token lifetime in seconds, bounded to `1..=MAX_SECONDS`.
///
/// # Examples
/// ```
/// use chirpy::domain::AccessTokenTtl;
///
/// assert_eq!(AccessTokenTtl::from_requested(None).seconds(), 3600);
/// assert_eq!(AccessTokenTtl::from_requested(Some(60)).seconds(), 60);
/// assert_eq!(AccessTokenTtl::from_requested(Some(86_400)).seconds(), 3600);
/// assert_eq!(AccessTokenTtl::from_requested(Some(0)).seconds(), 3600);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessTokenTtl(i64);

impl AccessTokenTtl {
    /// Default lifetime, also the ceiling for client requests.
    pub const MAX_SECONDS: i64 = 3600;

    /// Resolve a client-requested lifetime.
    ///
    /// Missing or non-positive requests use the default; larger requests are
    /// capped.
    #[must_use]
    pub fn from_requested(requested: Option<i64>) -> Self {
        match requested {
            Some(seconds) if seconds > 0 => Self(seconds.min(Self::MAX_SECONDS)),
            _ => Self(Self::MAX_SECONDS),
        }
    }

    /// Lifetime in seconds.
    #[must_use]
    pub fn seconds(self) -> i64 {
        self.0
    }

    /// Lifetime as a duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::seconds(self.0)
    }
}

impl Default for AccessTokenTtl {
    fn default() -> Self {
        Self(Self::MAX_SECONDS)
    }
}

/// Refresh token lifetime in whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTokenTtl(u32);

impl RefreshTokenTtl {
    /// Default lifetime in days.
    pub const DEFAULT_DAYS: u32 = 60;
    /// Longest accepted lifetime in days.
    pub const MAX_DAYS: u32 = 3650;

    /// Construct a lifetime of `1..=MAX_DAYS` days.
    #[must_use]
    pub fn from_days(days: u32) -> Option<Self> {
        (1..=Self::MAX_DAYS).contains(&days).then_some(Self(days))
    }

    /// Lifetime in days.
    #[must_use]
    pub fn days(self) -> u32 {
        self.0
    }

    /// Lifetime as a duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::days(i64::from(self.0))
    }
}

impl Default for RefreshTokenTtl {
    fn default() -> Self {
        Self(Self::DEFAULT_DAYS)
    }
}

/// Stored refresh session located by token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSession {
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

impl RefreshSession {
    /// Whether the session is still usable at `now`.
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub profile: UserProfile,
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyEmail)]
    #[case("   ", "pw", LoginValidationError::EmptyEmail)]
    #[case("walt@example.com", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = Credentials::try_from_parts(email, password).expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::try_from_parts("a@b.c", "hunter2").expect("valid");
        assert!(!format!("{creds:?}").contains("hunter2"));
    }

    #[test]
    fn refresh_tokens_are_64_hex_chars_and_distinct() {
        let first = RefreshToken::generate();
        let second = RefreshToken::generate();
        assert_eq!(first.as_str().len(), REFRESH_TOKEN_BYTES * 2);
        assert!(first.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }

    #[rstest]
    #[case(None, 3600)]
    #[case(Some(1), 1)]
    #[case(Some(3599), 3599)]
    #[case(Some(3600), 3600)]
    #[case(Some(3601), 3600)]
    #[case(Some(0), 3600)]
    #[case(Some(-5), 3600)]
    fn access_ttl_is_defaulted_and_capped(#[case] requested: Option<i64>, #[case] expected: i64) {
        assert_eq!(AccessTokenTtl::from_requested(requested).seconds(), expected);
    }

    #[test]
    fn access_claims_expire_after_ttl() {
        let now = Utc
            .with_ymd_and_hms(2026, 1, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        let subject = UserId::new(9).expect("id");
        let claims = AccessClaims::new(subject, now, AccessTokenTtl::from_requested(Some(120)));
        assert_eq!(claims.issuer, TOKEN_ISSUER);
        assert_eq!(claims.expires_at - claims.issued_at, Duration::seconds(120));
    }

    #[test]
    fn refresh_ttl_rejects_zero_days() {
        assert!(RefreshTokenTtl::from_days(0).is_none());
        assert_eq!(RefreshTokenTtl::default().days(), 60);
    }

    #[rstest]
    #[case(RefreshTokenTtl::MAX_DAYS, true)]
    #[case(RefreshTokenTtl::MAX_DAYS + 1, false)]
    #[case(u32::MAX, false)]
    fn refresh_ttl_is_bounded_above(#[case] days: u32, #[case] accepted: bool) {
        assert_eq!(RefreshTokenTtl::from_days(days).is_some(), accepted);
    }

    #[test]
    fn refresh_session_expires_at_boundary() {
        let expires_at = Utc
            .with_ymd_and_hms(2026, 3, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        let session = RefreshSession {
            user_id: UserId::new(1).expect("id"),
            expires_at,
        };
        assert!(session.is_active_at(expires_at - Duration::seconds(1)));
        assert!(!session.is_active_at(expires_at));
    }
}
