//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports ([`UserRepository`], [`ChirpRepository`], [`PasswordHasher`],
//! [`AccessTokenCodec`]) describe what the domain needs from adapters. Driving
//! ports ([`CredentialManager`], [`ChirpCommand`], [`ChirpQuery`]) are what
//! inbound adapters call. Each driven port exposes strongly typed errors.

mod macros;
pub(crate) use macros::define_port_error;

mod access_token_codec;
mod chirp_command;
mod chirp_query;
mod chirp_repository;
mod credential_manager;
mod password_hasher;
mod persistence_error;
mod user_repository;

#[cfg(test)]
pub use access_token_codec::MockAccessTokenCodec;
pub use access_token_codec::{AccessTokenCodec, TokenError};
#[cfg(test)]
pub use chirp_command::MockChirpCommand;
pub use chirp_command::ChirpCommand;
#[cfg(test)]
pub use chirp_query::MockChirpQuery;
pub use chirp_query::ChirpQuery;
#[cfg(test)]
pub use chirp_repository::MockChirpRepository;
pub use chirp_repository::ChirpRepository;
#[cfg(test)]
pub use credential_manager::MockCredentialManager;
pub use credential_manager::CredentialManager;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use persistence_error::StorePersistenceError;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
