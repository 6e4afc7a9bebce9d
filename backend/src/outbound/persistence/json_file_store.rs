//! JSON file record store.
//!
//! Every operation reloads the document from disk under one in-process lock,
//! applies its change and, when something changed, rewrites the whole file
//! atomically. Blocking file I/O runs on the Tokio blocking pool. There is no
//! cross-process locking, so only one process may own a store file.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domain::ports::{ChirpRepository, StorePersistenceError, UserRepository};
use crate::domain::{
    Chirp, ChirpBody, ChirpId, Email, PasswordHash, RefreshSession, RefreshToken, User, UserId,
};

use super::atomic_io::write_atomic;
use super::{Document, StoreError, UserRecord};

/// Outcome of a [`JsonFileStore::mutate`] closure.
#[derive(Debug)]
pub enum Mutation<T> {
    /// The document changed and must be written back.
    Commit(T),
    /// Nothing changed; the file is left alone.
    Skip(T),
}

struct StoreInner {
    dir: Dir,
    file_name: String,
    path: PathBuf,
    lock: Mutex<()>,
}

impl StoreInner {
    fn load(&self) -> Result<Document, StoreError> {
        let bytes = match self.dir.read(&self.file_name) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Document::default());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Document::default());
        }
        serde_json::from_slice(&bytes).map_err(|err| StoreError::Malformed {
            path: self.path.clone(),
            message: err.to_string(),
        })
    }

    fn save(&self, document: &Document) -> Result<(), StoreError> {
        let contents = serde_json::to_vec_pretty(document)?;
        write_atomic(&self.dir, &self.file_name, &contents).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn locked<T>(
        &self,
        op: impl FnOnce(&Self) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        op(self)
    }
}

/// Record store persisting chirps and users to a single JSON document.
///
/// Cloning is cheap; clones share the file handle and the lock.
///
/// # Examples
/// ```no_run
/// use chirpy::outbound::persistence::JsonFileStore;
///
/// # async fn demo() -> Result<(), chirpy::outbound::persistence::StoreError> {
/// let store = JsonFileStore::open("data/database.json")?;
/// let document = store.load().await?;
/// assert!(document.chirps.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct JsonFileStore {
    inner: Arc<StoreInner>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating missing parent directories and an
    /// empty document when the file does not exist yet.
    ///
    /// An existing file is not rewritten, even if it fails to parse.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] when `path` does not end in a file
    /// name and [`StoreError::Io`] when the directory or file cannot be
    /// created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            return Err(StoreError::InvalidPath {
                path: path.to_path_buf(),
            });
        };
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io_error = |source: std::io::Error| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        Dir::create_ambient_dir_all(parent, ambient_authority()).map_err(io_error)?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error)?;

        let inner = StoreInner {
            dir,
            file_name: file_name.to_owned(),
            path: path.to_path_buf(),
            lock: Mutex::new(()),
        };

        match inner.dir.metadata(&inner.file_name) {
            Ok(metadata) if metadata.is_dir() => {
                return Err(StoreError::InvalidPath {
                    path: path.to_path_buf(),
                });
            }
            Ok(_) => {
                if let Err(err) = inner.load() {
                    warn!(error = %err, "record store opened with an unreadable document");
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                inner.save(&Document::default())?;
                debug!(path = %path.display(), "record store initialised");
            }
            Err(source) => return Err(io_error(source)),
        }

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&StoreInner) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.locked(op))
            .await
            .map_err(|err| StoreError::Join {
                message: err.to_string(),
            })?
    }

    /// Read and parse the document. A missing or empty file is an empty
    /// document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Malformed`] when the file does not parse.
    pub async fn load(&self) -> Result<Document, StoreError> {
        self.blocking(StoreInner::load).await
    }

    /// Replace the file with `document`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the write fails; the previous file is
    /// left intact.
    pub async fn save(&self, document: Document) -> Result<(), StoreError> {
        self.blocking(move |inner| inner.save(&document)).await
    }

    /// Load, apply `change` and save, all under the store lock.
    ///
    /// The file is rewritten only when `change` returns
    /// [`Mutation::Commit`]. A document that fails to load is never
    /// overwritten.
    ///
    /// # Errors
    ///
    /// Propagates load and save failures.
    pub async fn mutate<T, F>(&self, change: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Document) -> Mutation<T> + Send + 'static,
        T: Send + 'static,
    {
        self.blocking(move |inner| {
            let mut document = inner.load()?;
            match change(&mut document) {
                Mutation::Commit(value) => {
                    inner.save(&document)?;
                    Ok(value)
                }
                Mutation::Skip(value) => Ok(value),
            }
        })
        .await
    }

    /// Load the document under the store lock and run `query` against it.
    ///
    /// # Errors
    ///
    /// Propagates load failures.
    pub async fn read<T, F>(&self, query: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Document) -> T + Send + 'static,
        T: Send + 'static,
    {
        self.blocking(move |inner| inner.load().map(|document| query(&document)))
            .await
    }

    /// Allocate the next user id and persist the account immediately.
    ///
    /// # Errors
    ///
    /// Propagates load, id allocation and save failures.
    pub async fn create_user(
        &self,
        email: &Email,
        password_hash: &PasswordHash,
    ) -> Result<UserRecord, StoreError> {
        let email = email.clone();
        let password_hash = password_hash.clone();
        self.mutate(move |document| commit_ok(document.insert_user(&email, &password_hash)))
            .await?
    }

    fn user_to_domain(&self, record: Option<UserRecord>) -> Result<Option<User>, StoreError> {
        record
            .map(|record| record.to_domain(self.path()))
            .transpose()
    }
}

fn commit_ok<T>(result: Result<T, StoreError>) -> Mutation<Result<T, StoreError>> {
    match result {
        Ok(value) => Mutation::Commit(Ok(value)),
        Err(err) => Mutation::Skip(Err(err)),
    }
}

#[async_trait]
impl UserRepository for JsonFileStore {
    async fn create(
        &self,
        email: &Email,
        password_hash: &PasswordHash,
    ) -> Result<User, StorePersistenceError> {
        let record = self.create_user(email, password_hash).await?;
        Ok(record.to_domain(self.path())?)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, StorePersistenceError> {
        let email = email.as_str().to_owned();
        let record = self
            .read(move |document| document.find_user_by_email(&email).cloned())
            .await?;
        Ok(self.user_to_domain(record)?)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StorePersistenceError> {
        let key = id.get();
        let record = self
            .read(move |document| document.users.get(&key).cloned())
            .await?;
        Ok(self.user_to_domain(record)?)
    }

    async fn update_credentials(
        &self,
        id: &UserId,
        email: &Email,
        password_hash: &PasswordHash,
    ) -> Result<Option<User>, StorePersistenceError> {
        let key = id.get();
        let email = email.as_str().to_owned();
        let password_hash = password_hash.as_str().to_owned();
        let record = self
            .mutate(move |document| match document.users.get_mut(&key) {
                Some(user) => {
                    user.email = email;
                    user.password_hash = password_hash;
                    Mutation::Commit(Some(user.clone()))
                }
                None => Mutation::Skip(None),
            })
            .await?;
        Ok(self.user_to_domain(record)?)
    }

    async fn store_refresh_token(
        &self,
        id: &UserId,
        token: &RefreshToken,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, StorePersistenceError> {
        let key = id.get();
        let token = token.as_str().to_owned();
        let stored = self
            .mutate(move |document| match document.users.get_mut(&key) {
                Some(user) => {
                    user.refresh_token = Some(token);
                    user.refresh_token_expires_at = Some(expires_at);
                    Mutation::Commit(true)
                }
                None => Mutation::Skip(false),
            })
            .await?;
        Ok(stored)
    }

    async fn find_refresh_session(
        &self,
        token: &RefreshToken,
    ) -> Result<Option<RefreshSession>, StorePersistenceError> {
        let token = token.as_str().to_owned();
        let record = self
            .read(move |document| document.find_user_by_refresh_token(&token).cloned())
            .await?;
        let session = record
            .map(|record| record.refresh_session(self.path()))
            .transpose()?
            .flatten();
        Ok(session)
    }

    async fn revoke_refresh_token(
        &self,
        token: &RefreshToken,
    ) -> Result<bool, StorePersistenceError> {
        let token = token.as_str().to_owned();
        let revoked = self
            .mutate(move |document| {
                if document.clear_refresh_token(&token) {
                    Mutation::Commit(true)
                } else {
                    Mutation::Skip(false)
                }
            })
            .await?;
        Ok(revoked)
    }
}

#[async_trait]
impl ChirpRepository for JsonFileStore {
    async fn create(
        &self,
        author: &UserId,
        body: &ChirpBody,
    ) -> Result<Chirp, StorePersistenceError> {
        let author = *author;
        let body = body.clone();
        let record = self
            .mutate(move |document| commit_ok(document.insert_chirp(author, &body)))
            .await??;
        Ok(record.to_domain(self.path())?)
    }

    async fn list(&self) -> Result<Vec<Chirp>, StorePersistenceError> {
        let records = self
            .read(|document| document.chirps.values().cloned().collect::<Vec<_>>())
            .await?;
        let chirps = records
            .iter()
            .map(|record| record.to_domain(self.path()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(chirps)
    }

    async fn find_by_id(&self, id: &ChirpId) -> Result<Option<Chirp>, StorePersistenceError> {
        let key = id.get();
        let record = self
            .read(move |document| document.chirps.get(&key).cloned())
            .await?;
        let chirp = record
            .map(|record| record.to_domain(self.path()))
            .transpose()?;
        Ok(chirp)
    }
}

#[cfg(test)]
#[path = "json_file_store_tests.rs"]
mod tests;
