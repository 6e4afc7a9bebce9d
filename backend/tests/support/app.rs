//! Real-adapter wiring shared by integration suites.

use std::path::Path;
use std::sync::Arc;

use mockable::DefaultClock;
use tempfile::TempDir;

use chirpy::domain::{ChirpService, CredentialService};
use chirpy::inbound::http::state::HttpState;
use chirpy::outbound::persistence::JsonFileStore;
use chirpy::outbound::security::{HashRounds, HmacAccessTokens, Pbkdf2PasswordHasher};

/// Signing secret used by every suite.
pub const TEST_SECRET: &str = "integration-test-secret";

/// Credential service over the real record store and security adapters.
pub type RealCredentialService =
    CredentialService<JsonFileStore, Pbkdf2PasswordHasher, HmacAccessTokens>;

/// Temporary database directory plus the path of its record store.
pub struct TempDatabase {
    _dir: TempDir,
    pub path: std::path::PathBuf,
}

impl TempDatabase {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("database.json");
        Self { _dir: dir, path }
    }
}

/// Fastest accepted hasher.
pub fn fast_hasher() -> Pbkdf2PasswordHasher {
    Pbkdf2PasswordHasher::new(
        HashRounds::new(HashRounds::MIN).expect("minimum rounds are accepted"),
    )
}

pub fn open_store(path: &Path) -> Arc<JsonFileStore> {
    Arc::new(JsonFileStore::open(path).expect("store opens"))
}

pub fn credential_service(store: Arc<JsonFileStore>) -> RealCredentialService {
    CredentialService::new(
        store,
        Arc::new(fast_hasher()),
        Arc::new(HmacAccessTokens::new(TEST_SECRET)),
        Arc::new(DefaultClock),
    )
}

/// HTTP state backed by a fresh store at `path`.
pub fn http_state(path: &Path) -> HttpState {
    let store = open_store(path);
    let chirps = Arc::new(ChirpService::new(Arc::clone(&store)));
    HttpState::new(
        Arc::new(credential_service(store)),
        chirps.clone(),
        chirps,
    )
}
