//! Credential primitives: password hashing and access token signing.

mod hmac_access_tokens;
mod pbkdf2_password_hasher;

pub use hmac_access_tokens::HmacAccessTokens;
pub use pbkdf2_password_hasher::{HashRounds, HashRoundsError, Pbkdf2PasswordHasher};

/// Compare two byte strings without short-circuiting on the first mismatch.
///
/// Length differences are not hidden.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0_u8, |diff, (x, y)| diff | (x ^ y)) == 0
}
