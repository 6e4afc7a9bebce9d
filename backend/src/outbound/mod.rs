//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: the JSON file record store backing the user and chirp
//!   repositories.
//! - **security**: PBKDF2 password hashing and HMAC-signed access tokens.
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod persistence;
pub mod security;
