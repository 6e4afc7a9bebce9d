//! Chirp data model and body validation.
//!
//! Bodies are limited to [`MAX_CHIRP_LENGTH`] characters and have a fixed set
//! of words masked before they are stored or echoed back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Maximum body length, counted in Unicode scalar values.
pub const MAX_CHIRP_LENGTH: usize = 140;

const MASK: &str = "****";
const MASKED_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

/// Validation errors for chirp input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChirpValidationError {
    /// Body was empty or whitespace only.
    EmptyBody,
    /// Body exceeded [`MAX_CHIRP_LENGTH`].
    TooLong { max: usize, actual: usize },
    /// Identifier was not a positive integer.
    InvalidId,
}

impl fmt::Display for ChirpValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBody => write!(f, "Chirp must not be empty"),
            Self::TooLong { .. } => write!(f, "Chirp is too long"),
            Self::InvalidId => write!(f, "chirp id must be a positive integer"),
        }
    }
}

impl std::error::Error for ChirpValidationError {}

/// Store-allocated chirp identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ChirpId(u64);

impl ChirpId {
    /// Validate and construct a [`ChirpId`].
    pub fn new(id: u64) -> Result<Self, ChirpValidationError> {
        if id == 0 {
            return Err(ChirpValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Raw numeric value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChirpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChirpId {
    type Err = ChirpValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .parse::<u64>()
            .map_err(|_| ChirpValidationError::InvalidId)?;
        Self::new(raw)
    }
}

impl TryFrom<u64> for ChirpId {
    type Error = ChirpValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChirpId> for u64 {
    fn from(value: ChirpId) -> Self {
        value.0
    }
}

/// Validated, masked chirp body.
///
/// # Examples
/// ```
/// use chirpy::domain::ChirpBody;
///
/// let body = ChirpBody::parse("What a Kerfuffle today").expect("valid body");
/// assert_eq!(body.as_str(), "What a **** today");
///
/// let untouched = ChirpBody::parse("kerfuffled! kerfuffle!").expect("valid body");
/// assert_eq!(untouched.as_str(), "kerfuffled! kerfuffle!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct ChirpBody(String);

impl ChirpBody {
    /// Validate raw client input and mask denylisted words.
    ///
    /// Words are the pieces between single spaces. A word is masked only when
    /// it equals a denylisted word ignoring ASCII case, so punctuation or a
    /// suffix keeps it intact.
    pub fn parse(raw: &str) -> Result<Self, ChirpValidationError> {
        if raw.trim().is_empty() {
            return Err(ChirpValidationError::EmptyBody);
        }
        let length = raw.chars().count();
        if length > MAX_CHIRP_LENGTH {
            return Err(ChirpValidationError::TooLong {
                max: MAX_CHIRP_LENGTH,
                actual: length,
            });
        }
        Ok(Self(mask_words(raw)))
    }

    /// Borrow the masked body.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

// Bodies read back from the store were validated when they were written.
impl From<String> for ChirpBody {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<ChirpBody> for String {
    fn from(value: ChirpBody) -> Self {
        value.0
    }
}

impl fmt::Display for ChirpBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn mask_words(raw: &str) -> String {
    raw.split(' ')
        .map(|word| {
            if MASKED_WORDS
                .iter()
                .any(|masked| word.eq_ignore_ascii_case(masked))
            {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Persisted chirp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Chirp {
    #[schema(value_type = u64, example = 1)]
    pub id: ChirpId,
    #[schema(value_type = String, example = "I'm the one who knocks!")]
    pub body: ChirpBody,
    #[schema(value_type = u64, example = 1)]
    pub author_id: UserId,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("I had something interesting for breakfast", "I had something interesting for breakfast")]
    #[case("I hear Mastodon is better than Chirpy. sharbert I need to migrate", "I hear Mastodon is better than Chirpy. **** I need to migrate")]
    #[case("I really need a kerfuffle to go to bed sooner, Fornax !", "I really need a **** to go to bed sooner, **** !")]
    #[case("KERFUFFLE", "****")]
    #[case("kerfuffled kerfuffle! Sharbert.", "kerfuffled kerfuffle! Sharbert.")]
    #[case("two  spaces  fornax", "two  spaces  ****")]
    fn masks_exact_words_only(#[case] raw: &str, #[case] expected: &str) {
        let body = ChirpBody::parse(raw).expect("valid body");
        assert_eq!(body.as_str(), expected);
    }

    #[test]
    fn accepts_exactly_max_length() {
        let raw = "a".repeat(MAX_CHIRP_LENGTH);
        assert!(ChirpBody::parse(&raw).is_ok());
    }

    #[test]
    fn rejects_over_max_length() {
        let raw = "a".repeat(MAX_CHIRP_LENGTH + 1);
        let err = ChirpBody::parse(&raw).expect_err("too long");
        assert_eq!(
            err,
            ChirpValidationError::TooLong {
                max: MAX_CHIRP_LENGTH,
                actual: MAX_CHIRP_LENGTH + 1,
            }
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        let raw = "é".repeat(MAX_CHIRP_LENGTH);
        assert!(raw.len() > MAX_CHIRP_LENGTH);
        assert!(ChirpBody::parse(&raw).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_blank_bodies(#[case] raw: &str) {
        assert_eq!(ChirpBody::parse(raw), Err(ChirpValidationError::EmptyBody));
    }

    #[rstest]
    #[case("0")]
    #[case("x")]
    #[case("-3")]
    fn rejects_invalid_ids(#[case] raw: &str) {
        assert_eq!(raw.parse::<ChirpId>(), Err(ChirpValidationError::InvalidId));
    }

    #[test]
    fn chirp_serialises_flat() {
        let chirp = Chirp {
            id: ChirpId::new(4).expect("id"),
            body: ChirpBody::parse("hello").expect("body"),
            author_id: UserId::new(2).expect("id"),
        };
        let value = serde_json::to_value(&chirp).expect("serialise");
        assert_eq!(
            value,
            serde_json::json!({ "id": 4, "body": "hello", "author_id": 2 })
        );
    }
}
