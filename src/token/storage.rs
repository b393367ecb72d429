//! Token Storage
//!
//! Durable storage backends for token state, with runtime availability
//! probing.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

use crate::error::StorageError;
use crate::types::TokenState;

/// Token storage interface.
///
/// The manager probes `is_available` before every durable access and falls
/// back to memory-only behavior when the backend reports unavailable.
pub trait TokenStorage: Send + Sync {
    /// Check whether the backend can actually be written to.
    ///
    /// Must perform a real write+remove probe, not just an
    /// existence-of-medium check: some environments expose a storage
    /// location with zero usable quota.
    fn is_available(&self) -> bool;

    /// Store token state under a key, overwriting any prior entry.
    fn set(&self, key: &str, state: &TokenState) -> Result<(), StorageError>;

    /// Retrieve token state for a key.
    ///
    /// Returns `None` when the entry is absent or cannot be deserialized.
    fn get(&self, key: &str) -> Result<Option<TokenState>, StorageError>;

    /// Remove the entry for a key. No-op if absent.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: TokenStorage> TokenStorage for std::sync::Arc<S> {
    fn is_available(&self) -> bool {
        self.as_ref().is_available()
    }

    fn set(&self, key: &str, state: &TokenState) -> Result<(), StorageError> {
        self.as_ref().set(key, state)
    }

    fn get(&self, key: &str) -> Result<Option<TokenState>, StorageError> {
        self.as_ref().get(key)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.as_ref().remove(key)
    }
}

/// File-backed token storage.
///
/// One JSON file per key under the configured directory. Entries survive
/// process restarts.
#[derive(Clone, Debug)]
pub struct FileTokenStorage {
    dir: PathBuf,
}

impl FileTokenStorage {
    /// Create file-backed storage rooted at the given directory.
    ///
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn write_entry(&self, path: &Path, contents: &str) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(path, contents)?;

        // Token material gets restrictive permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}

impl TokenStorage for FileTokenStorage {
    fn is_available(&self) -> bool {
        let probe = self.entry_path("__storage_probe__");
        let ok = self
            .write_entry(&probe, "{}")
            .and_then(|_| fs::remove_file(&probe))
            .is_ok();

        if !ok {
            warn!(dir = %self.dir.display(), "token storage probe failed");
        }
        ok
    }

    fn set(&self, key: &str, state: &TokenState) -> Result<(), StorageError> {
        let contents =
            serde_json::to_string_pretty(state).map_err(|e| StorageError::WriteFailed {
                message: e.to_string(),
            })?;

        self.write_entry(&self.entry_path(key), &contents)
            .map_err(|e| StorageError::WriteFailed {
                message: e.to_string(),
            })
    }

    fn get(&self, key: &str) -> Result<Option<TokenState>, StorageError> {
        let path = self.entry_path(key);

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::ReadFailed {
                    message: e.to_string(),
                })
            }
        };

        match serde_json::from_str(&contents) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                // Corrupt entries read as absent per the storage contract
                warn!(key, error = %e, "discarding malformed stored token entry");
                Ok(None)
            }
        }
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed {
                message: e.to_string(),
            }),
        }
    }
}

/// In-memory token storage.
///
/// Always available; entries live as long as the storage value itself.
#[derive(Default)]
pub struct InMemoryTokenStorage {
    entries: Mutex<HashMap<String, TokenState>>,
}

impl InMemoryTokenStorage {
    /// Create new in-memory token storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for InMemoryTokenStorage {
    fn is_available(&self) -> bool {
        true
    }

    fn set(&self, key: &str, state: &TokenState) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), state.clone());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<TokenState>, StorageError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Mock token storage for testing.
#[derive(Default)]
pub struct MockTokenStorage {
    entries: Mutex<HashMap<String, TokenState>>,
    available: Mutex<bool>,
    should_fail: Mutex<bool>,
    set_history: Mutex<Vec<String>>,
    get_history: Mutex<Vec<String>>,
    remove_history: Mutex<Vec<String>>,
}

impl MockTokenStorage {
    /// Create new mock storage, available by default.
    pub fn new() -> Self {
        Self {
            available: Mutex::new(true),
            ..Self::default()
        }
    }

    /// Set whether the availability probe succeeds.
    pub fn set_available(&self, available: bool) -> &Self {
        *self.available.lock().unwrap() = available;
        self
    }

    /// Set storage to fail all operations.
    pub fn set_should_fail(&self, should_fail: bool) -> &Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    /// Pre-populate an entry.
    pub fn add_entry(&self, key: &str, state: TokenState) -> &Self {
        self.entries.lock().unwrap().insert(key.to_string(), state);
        self
    }

    /// Remove an entry out-of-band, bypassing histories.
    pub fn remove_entry_externally(&self, key: &str) -> &Self {
        self.entries.lock().unwrap().remove(key);
        self
    }

    /// Check whether an entry exists.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    /// Get set-call history.
    pub fn get_set_history(&self) -> Vec<String> {
        self.set_history.lock().unwrap().clone()
    }

    /// Get get-call history.
    pub fn get_get_history(&self) -> Vec<String> {
        self.get_history.lock().unwrap().clone()
    }

    /// Get remove-call history.
    pub fn get_remove_history(&self) -> Vec<String> {
        self.remove_history.lock().unwrap().clone()
    }

    fn check_error(&self) -> Result<(), StorageError> {
        if *self.should_fail.lock().unwrap() {
            return Err(StorageError::WriteFailed {
                message: "mock storage failure".to_string(),
            });
        }
        Ok(())
    }
}

impl TokenStorage for MockTokenStorage {
    fn is_available(&self) -> bool {
        *self.available.lock().unwrap()
    }

    fn set(&self, key: &str, state: &TokenState) -> Result<(), StorageError> {
        self.check_error()?;
        self.set_history.lock().unwrap().push(key.to_string());
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), state.clone());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<TokenState>, StorageError> {
        self.check_error()?;
        self.get_history.lock().unwrap().push(key.to_string());
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_error()?;
        self.remove_history.lock().unwrap().push(key.to_string());
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Create in-memory token storage.
pub fn create_in_memory_token_storage() -> InMemoryTokenStorage {
    InMemoryTokenStorage::new()
}

/// Create mock token storage for testing.
pub fn create_mock_token_storage() -> MockTokenStorage {
    MockTokenStorage::new()
}
