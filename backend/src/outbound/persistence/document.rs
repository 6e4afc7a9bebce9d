//! On-disk shape of the record store.
//!
//! The whole document is read and rewritten on every operation. Records use
//! plain field types; conversion into domain types happens at the repository
//! edge so a damaged record surfaces as [`StoreError::Malformed`] instead of a
//! parse failure for the whole file.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Chirp, ChirpBody, ChirpId, Email, PasswordHash, RefreshSession, User, UserId,
};
use crate::outbound::security::constant_time_eq;

use super::StoreError;

/// Persisted chirp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChirpRecord {
    pub id: u64,
    pub body: String,
    pub author_id: u64,
}

/// Persisted account, including its refresh session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub email: String,
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
}

/// Entire store contents.
///
/// ## Invariants
/// - Map keys equal the `id` of their record.
/// - `last_*_id` never decreases, so ids are never reused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub chirps: BTreeMap<u64, ChirpRecord>,
    #[serde(default)]
    pub users: BTreeMap<u64, UserRecord>,
    #[serde(default)]
    pub last_chirp_id: u64,
    #[serde(default)]
    pub last_user_id: u64,
}

fn next_id<V>(last: u64, records: &BTreeMap<u64, V>, collection: &'static str) -> Result<u64, StoreError> {
    let highest = records.keys().next_back().copied().unwrap_or(0);
    last.max(highest)
        .checked_add(1)
        .ok_or(StoreError::Exhausted { collection })
}

impl Document {
    /// Append a chirp under the next id. Does not persist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Exhausted`] once the id space is used up.
    pub fn insert_chirp(
        &mut self,
        author: UserId,
        body: &ChirpBody,
    ) -> Result<ChirpRecord, StoreError> {
        let id = next_id(self.last_chirp_id, &self.chirps, "chirp")?;
        let record = ChirpRecord {
            id,
            body: body.as_str().to_owned(),
            author_id: author.get(),
        };
        self.chirps.insert(id, record.clone());
        self.last_chirp_id = id;
        Ok(record)
    }

    /// Append a user under the next id. Does not persist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Exhausted`] once the id space is used up.
    pub fn insert_user(
        &mut self,
        email: &Email,
        password_hash: &PasswordHash,
    ) -> Result<UserRecord, StoreError> {
        let id = next_id(self.last_user_id, &self.users, "user")?;
        let record = UserRecord {
            id,
            email: email.as_str().to_owned(),
            password_hash: password_hash.as_str().to_owned(),
            refresh_token: None,
            refresh_token_expires_at: None,
        };
        self.users.insert(id, record.clone());
        self.last_user_id = id;
        Ok(record)
    }

    /// Lowest-id user registered under `email`.
    #[must_use]
    pub fn find_user_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.users.values().find(|user| user.email == email)
    }

    /// User currently holding exactly `token`.
    #[must_use]
    pub fn find_user_by_refresh_token(&self, token: &str) -> Option<&UserRecord> {
        self.users.values().find(|user| {
            user.refresh_token
                .as_deref()
                .is_some_and(|stored| constant_time_eq(stored.as_bytes(), token.as_bytes()))
        })
    }

    /// Clear `token` from every user holding it. Returns whether any changed.
    pub fn clear_refresh_token(&mut self, token: &str) -> bool {
        let mut cleared = false;
        for user in self.users.values_mut() {
            let holds = user
                .refresh_token
                .as_deref()
                .is_some_and(|stored| constant_time_eq(stored.as_bytes(), token.as_bytes()));
            if holds {
                user.refresh_token = None;
                user.refresh_token_expires_at = None;
                cleared = true;
            }
        }
        cleared
    }
}

impl ChirpRecord {
    /// Convert into the domain type, rejecting damaged records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Malformed`] when an id is zero.
    pub fn to_domain(&self, path: &Path) -> Result<Chirp, StoreError> {
        let id = ChirpId::new(self.id).map_err(|err| malformed(path, "chirp", self.id, &err))?;
        let author_id =
            UserId::new(self.author_id).map_err(|err| malformed(path, "chirp", self.id, &err))?;
        Ok(Chirp {
            id,
            body: ChirpBody::from(self.body.clone()),
            author_id,
        })
    }
}

impl UserRecord {
    /// Convert into the domain type, rejecting damaged records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Malformed`] when the id is zero or the email blank.
    pub fn to_domain(&self, path: &Path) -> Result<User, StoreError> {
        let id = UserId::new(self.id).map_err(|err| malformed(path, "user", self.id, &err))?;
        let email = Email::new(&self.email).map_err(|err| malformed(path, "user", self.id, &err))?;
        Ok(User::new(
            id,
            email,
            PasswordHash::new(self.password_hash.clone()),
        ))
    }

    /// Refresh session held by this user, if it carries an expiry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Malformed`] when the id is zero.
    pub fn refresh_session(&self, path: &Path) -> Result<Option<RefreshSession>, StoreError> {
        let user_id = UserId::new(self.id).map_err(|err| malformed(path, "user", self.id, &err))?;
        Ok(self
            .refresh_token_expires_at
            .map(|expires_at| RefreshSession {
                user_id,
                expires_at,
            }))
    }
}

fn malformed(path: &Path, kind: &str, id: u64, err: &dyn std::error::Error) -> StoreError {
    StoreError::Malformed {
        path: path.to_path_buf(),
        message: format!("{kind} record {id}: {err}"),
    }
}
