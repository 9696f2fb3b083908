//! Device-local persisted storage.
//!
//! A key/value store of JSON files under the app's data directory - the
//! desktop/server-side stand-in for a mobile device's local storage. Each
//! key owns one file; writes replace the whole value (last write wins).

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Keys used by the stores in this crate.
pub mod storage_keys {
    /// Key for the persisted auth token.
    pub const TOKEN: &str = "token";

    /// Key for the persisted cart line items.
    pub const CART_ITEMS: &str = "cartItems";
}

/// Errors from device storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value failed to encode/decode.
    #[error("storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// JSON file-per-key storage rooted at a directory.
#[derive(Debug, Clone)]
pub struct DeviceStorage {
    dir: PathBuf,
}

impl DeviceStorage {
    /// Open storage rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Read and decode a value. Absent keys are `None`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` on read failure and `StorageError::Serde`
    /// if the stored JSON does not decode as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Encode and write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serde` on encode failure and
    /// `StorageError::Io` on write failure.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let text = serde_json::to_string(value)?;
        fs::write(self.path(key), text)?;
        Ok(())
    }

    /// Remove a key. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` on filesystem failure.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

/// The persisted auth token.
///
/// Owned by the session coordinator; nothing else writes it.
#[derive(Debug, Clone)]
pub struct TokenStore {
    storage: DeviceStorage,
}

impl TokenStore {
    /// Create a token store over device storage.
    #[must_use]
    pub const fn new(storage: DeviceStorage) -> Self {
        Self { storage }
    }

    /// Read the persisted token, if any. Read failures are logged and
    /// treated as "no token" so a corrupt file cannot brick startup.
    #[must_use]
    pub fn load(&self) -> Option<String> {
        match self.storage.get::<String>(storage_keys::TOKEN) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load persisted token");
                None
            }
        }
    }

    /// Persist the token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on write failure.
    pub fn save(&self, token: &str) -> Result<(), StorageError> {
        self.storage.put(storage_keys::TOKEN, &token)
    }

    /// Delete the persisted token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on filesystem failure.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(storage_keys::TOKEN)
    }
}
