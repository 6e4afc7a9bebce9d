//! User data model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors returned by the user primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Identifier was zero.
    ZeroId,
    /// Identifier was not a positive integer.
    InvalidId,
    /// Email was missing or blank once trimmed.
    EmptyEmail,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroId => write!(f, "user id must be positive"),
            Self::InvalidId => write!(f, "user id must be a positive integer"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier allocated by the record store.
///
/// # Examples
/// ```
/// use chirpy::domain::UserId;
///
/// let id: UserId = "7".parse().expect("numeric id");
/// assert_eq!(id.get(), 7);
/// assert!(UserId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct UserId(u64);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: u64) -> Result<Self, UserValidationError> {
        if id == 0 {
            return Err(UserValidationError::ZeroId);
        }
        Ok(Self(id))
    }

    /// Raw numeric value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.parse::<u64>().map_err(|_| UserValidationError::InvalidId)?;
        Self::new(raw)
    }
}

impl TryFrom<u64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for u64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Account email address.
///
/// Only surrounding whitespace is normalised. Addresses are not required to
/// be unique across accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

/// Encoded password hash produced by a [`crate::domain::ports::PasswordHasher`].
///
/// The encoding is owned by the hasher; the domain treats it as opaque and
/// never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Borrow the encoded form for persistence.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Registered account.
///
/// ## Invariants
/// - `id` is positive and never reused by the store.
/// - `password_hash` is the only form in which the password is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    password_hash: PasswordHash,
}

impl User {
    /// Assemble a user from its parts.
    #[must_use]
    pub fn new(id: UserId, email: Email, password_hash: PasswordHash) -> Self {
        Self {
            id,
            email,
            password_hash,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Account email.
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Stored password hash.
    #[must_use]
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Public view without credentials.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

/// Public projection of a [`User`] returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    #[schema(value_type = u64, example = 1)]
    pub id: UserId,
    #[schema(value_type = String, example = "walt@breakingbad.com")]
    pub email: Email,
}
