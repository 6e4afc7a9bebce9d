//! HS256 compact JWS access tokens.
//!
//! Tokens are `header.claims.signature`, each segment base64url without
//! padding. Only the `HS256` algorithm is accepted on verification.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::domain::ports::{AccessTokenCodec, TokenError};
use crate::domain::{AccessClaims, AccessToken, TOKEN_ISSUER, UserId};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    iss: String,
    sub: String,
    iat: i64,
    exp: i64,
}

/// [`AccessTokenCodec`] signing with a shared HMAC-SHA256 secret.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use chirpy::domain::ports::AccessTokenCodec;
/// use chirpy::domain::{AccessClaims, AccessTokenTtl, UserId};
/// use chirpy::outbound::security::HmacAccessTokens;
///
/// let codec = HmacAccessTokens::new("secret");
/// let now = Utc::now();
/// let claims = AccessClaims::new(UserId::new(1).unwrap(), now, AccessTokenTtl::default());
/// let token = codec.issue(&claims).unwrap();
/// assert_eq!(codec.verify(token.as_str(), now).unwrap().subject.get(), 1);
/// ```
pub struct HmacAccessTokens {
    secret: Zeroizing<Vec<u8>>,
}

impl HmacAccessTokens {
    /// Codec keyed with `secret`.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: Zeroizing::new(secret.as_ref().to_vec()),
        }
    }

    fn mac(&self, signing_input: &str) -> Result<HmacSha256, TokenError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|err| TokenError::encoding(err.to_string()))?;
        mac.update(signing_input.as_bytes());
        Ok(mac)
    }
}

impl std::fmt::Debug for HmacAccessTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HmacAccessTokens(..)")
    }
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, TokenError> {
    let json = serde_json::to_vec(value).map_err(|err| TokenError::encoding(err.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|err| TokenError::malformed(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| TokenError::malformed(err.to_string()))
}

fn timestamp(seconds: i64) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| TokenError::malformed(format!("timestamp {seconds} out of range")))
}

impl AccessTokenCodec for HmacAccessTokens {
    fn issue(&self, claims: &AccessClaims) -> Result<AccessToken, TokenError> {
        let header = encode_segment(&Header {
            alg: ALGORITHM.to_owned(),
            typ: Some("JWT".to_owned()),
        })?;
        let payload = encode_segment(&WireClaims {
            iss: claims.issuer.clone(),
            sub: claims.subject.to_string(),
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
        })?;
        let signing_input = format!("{header}.{payload}");
        let signature = self.mac(&signing_input)?.finalize().into_bytes();
        Ok(AccessToken::new(format!(
            "{signing_input}.{}",
            URL_SAFE_NO_PAD.encode(signature)
        )))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, TokenError> {
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::malformed("expected three segments"));
        };

        let parsed_header: Header = decode_segment(header)?;
        if parsed_header.alg != ALGORITHM {
            return Err(TokenError::unsupported_algorithm(parsed_header.alg));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|err| TokenError::malformed(err.to_string()))?;
        let (signing_input, _) = token
            .rsplit_once('.')
            .ok_or_else(|| TokenError::malformed("expected three segments"))?;
        self.mac(signing_input)?
            .verify_slice(&signature)
            .map_err(|_| TokenError::bad_signature())?;

        let claims: WireClaims = decode_segment(payload)?;
        if claims.iss != TOKEN_ISSUER {
            return Err(TokenError::wrong_issuer());
        }
        let expires_at = timestamp(claims.exp)?;
        if now >= expires_at {
            return Err(TokenError::expired());
        }
        let subject = claims
            .sub
            .parse::<UserId>()
            .map_err(|err| TokenError::malformed(err.to_string()))?;

        Ok(AccessClaims {
            issuer: claims.iss,
            subject,
            issued_at: timestamp(claims.iat)?,
            expires_at,
        })
    }
}
