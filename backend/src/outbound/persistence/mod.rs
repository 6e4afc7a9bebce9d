//! JSON file persistence adapter.
//!
//! The record store keeps every chirp and user in one JSON document and
//! implements the [`crate::domain::ports::UserRepository`] and
//! [`crate::domain::ports::ChirpRepository`] ports.
//!
//! # Architecture
//!
//! - **Thin adapter**: repository methods only translate between records and
//!   domain types. Validation and policy live in the domain services.
//! - **Internal records**: [`ChirpRecord`] and [`UserRecord`] describe the
//!   on-disk shape and never leak past the adapter's public helpers.
//! - **One critical section**: a single lock serialises every load/save pair.
//!   Every mutation rewrites the whole document, which bounds throughput to
//!   one file rewrite at a time.
//! - **Strongly typed errors**: [`StoreError`] maps into
//!   [`crate::domain::ports::StorePersistenceError`] at the port boundary.

mod atomic_io;
mod document;
mod error;
mod json_file_store;

pub use document::{ChirpRecord, Document, UserRecord};
pub use error::StoreError;
pub use json_file_store::{JsonFileStore, Mutation};
