//! Durable credential storage.
//!
//! The [`TokenStore`] keeps the session credential under a single fixed key
//! in a [`DurableStorage`] backend, so it survives restarts the way browser
//! local storage survives page reloads.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use utf8path::Path;

use crate::error::{Error, Result};

/// The key the credential is stored under.
pub const TOKEN_KEY: &str = "accessToken";

/// A string key-value store that outlives the process.
pub trait DurableStorage: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`.  Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}

///////////////////////////////////////////// FileStorage ////////////////////////////////////////////

/// Storage backed by a single JSON object on disk.
///
/// Every operation re-reads the file.  Writes land in a sibling temporary
/// file that is renamed over the original.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: Path<'static>,
}

impl FileStorage {
    /// Creates storage at `path`.  The file is created on first write.
    pub fn new(path: &str) -> Self {
        Self {
            path: Path::from(path).into_owned(),
        }
    }

    /// The file this storage reads and writes.
    pub fn path(&self) -> &Path<'static> {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(self.path.as_str()) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                Error::storage(format!("{} is not a storage file: {e}", self.path.as_str()))
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(Error::storage(format!(
                "could not read {}: {err}",
                self.path.as_str()
            ))),
        }
    }

    fn store(&self, items: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = std::path::Path::new(self.path.as_str()).parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let tmp = format!("{}.tmp", self.path.as_str());
        fs::write(&tmp, serde_json::to_vec_pretty(items)?)?;
        fs::rename(&tmp, self.path.as_str()).map_err(|err| {
            Error::storage(format!("could not replace {}: {err}", self.path.as_str()))
        })
    }
}

impl DurableStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.load()?;
        items.insert(key.to_string(), value.to_string());
        self.store(&items)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.load()?;
        if items.remove(key).is_some() {
            self.store(&items)?;
        }
        Ok(())
    }
}

//////////////////////////////////////////// MemoryStorage ///////////////////////////////////////////

/// Process-local storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| Error::storage("memory storage lock poisoned"))
    }
}

impl DurableStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items()?.remove(key);
        Ok(())
    }
}

////////////////////////////////////////////// TokenStore //////////////////////////////////////////////

/// Holder for the session credential.
///
/// Cloning is cheap; clones share the same backing storage.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn DurableStorage>,
}

impl TokenStore {
    /// Creates a token store over `storage`.
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        Self { storage }
    }

    /// Creates a token store that forgets everything when the process exits.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Stores `token` as the credential.  The token's shape is not checked.
    pub fn set_token(&self, token: &str) -> Result<()> {
        self.storage.set_item(TOKEN_KEY, token)
    }

    /// Returns the stored credential, if any.
    pub fn get_token(&self) -> Result<Option<Credential>> {
        Ok(self.storage.get_item(TOKEN_KEY)?.map(Credential::new))
    }

    /// Forgets the stored credential.
    pub fn delete_token(&self) -> Result<()> {
        self.storage.remove_item(TOKEN_KEY)
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}

////////////////////////////////////////////// Credential //////////////////////////////////////////////

/// An opaque bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The value sent in an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Best-effort extraction of the `name` claim from a JWT-shaped token.
    ///
    /// Nothing is verified; this is for display only.
    pub fn username(&self) -> Option<String> {
        #[derive(Deserialize)]
        struct Claims {
            name: Option<String>,
        }

        let payload = self.0.split('.').nth(1)?;
        let decoded = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .ok()?;
        serde_json::from_slice::<Claims>(&decoded).ok()?.name
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(..)")
    }
}

impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}
