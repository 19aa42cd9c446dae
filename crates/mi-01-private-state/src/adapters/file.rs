//! # File-backed Store
//!
//! Identities live in one JSON document:
//!
//! ```text
//! { "<storage key>": { "secret_key": "<hex>" }, ... }
//! ```
//!
//! Writes go to a temporary file that is synced and renamed over the
//! document, so a crash leaves either the old or the new document.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Identity, IndexError};
use tracing::{debug, info};

use crate::adapters::lock::DirectoryLock;
use crate::config::PrivateStateConfig;
use crate::domain::PrivateStateKey;
use crate::ports::PrivateStateStore;

type Document = BTreeMap<String, Identity>;

fn storage_err(context: &str, path: &Path, err: impl std::fmt::Display) -> IndexError {
    IndexError::Storage(format!("{context} {}: {err}", path.display()))
}

/// JSON document store guarded by a directory lock.
pub struct FilePrivateStateStore {
    document_path: PathBuf,
    identities: RwLock<Document>,
    _lock: DirectoryLock,
}

impl FilePrivateStateStore {
    /// Open (or create) the store described by `config`.
    ///
    /// Fails with `Storage` if another store holds the directory.
    pub fn open(config: &PrivateStateConfig) -> Result<Self, IndexError> {
        fs::create_dir_all(&config.directory)
            .map_err(|e| storage_err("cannot create", &config.directory, e))?;

        let lock = DirectoryLock::acquire(&config.directory)?;
        let document_path = config.document_path();
        let identities = Self::load(&document_path)?;

        info!(
            path = %document_path.display(),
            identities = identities.len(),
            "Private state store opened"
        );

        Ok(Self {
            document_path,
            identities: RwLock::new(identities),
            _lock: lock,
        })
    }

    fn load(path: &Path) -> Result<Document, IndexError> {
        if !path.exists() {
            return Ok(Document::new());
        }
        let bytes = fs::read(path).map_err(|e| storage_err("cannot read", path, e))?;
        if bytes.is_empty() {
            return Ok(Document::new());
        }
        let document: Document =
            serde_json::from_slice(&bytes).map_err(|e| storage_err("corrupt document", path, e))?;
        for raw in document.keys() {
            PrivateStateKey::from_storage_key(raw)?;
        }
        Ok(document)
    }

    fn persist(&self, document: &Document) -> Result<(), IndexError> {
        let json = serde_json::to_vec_pretty(document)
            .map_err(|e| storage_err("cannot encode", &self.document_path, e))?;

        let tmp_path = self.document_path.with_extension("json.tmp");
        let mut options = OpenOptions::new();
        options.create(true).write(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&tmp_path)
            .map_err(|e| storage_err("cannot write", &tmp_path, e))?;
        file.write_all(&json)
            .and_then(|_| file.sync_all())
            .map_err(|e| storage_err("cannot write", &tmp_path, e))?;
        fs::rename(&tmp_path, &self.document_path)
            .map_err(|e| storage_err("cannot replace", &self.document_path, e))?;
        Ok(())
    }

    /// Apply `change` to a copy of the document, persist it, then publish it.
    fn update<R>(&self, change: impl FnOnce(&mut Document) -> R) -> Result<R, IndexError> {
        let mut guard = self.identities.write();
        let mut next = guard.clone();
        let result = change(&mut next);
        self.persist(&next)?;
        *guard = next;
        Ok(result)
    }

    /// Path of the JSON document.
    pub fn document_path(&self) -> &Path {
        &self.document_path
    }
}

#[async_trait]
impl PrivateStateStore for FilePrivateStateStore {
    async fn get(&self, key: &PrivateStateKey) -> Result<Option<Identity>, IndexError> {
        Ok(self.identities.read().get(&key.storage_key()).cloned())
    }

    async fn set(&self, key: &PrivateStateKey, identity: Identity) -> Result<(), IndexError> {
        key.validate()?;
        self.update(|doc| {
            doc.insert(key.storage_key(), identity);
        })?;
        debug!(key = %key, "Identity persisted");
        Ok(())
    }

    async fn remove(&self, key: &PrivateStateKey) -> Result<bool, IndexError> {
        if !self.identities.read().contains_key(&key.storage_key()) {
            return Ok(false);
        }
        self.update(|doc| doc.remove(&key.storage_key()).is_some())
    }

    async fn clear(&self) -> Result<(), IndexError> {
        self.update(|doc| doc.clear())?;
        info!(path = %self.document_path.display(), "All identities cleared");
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<PrivateStateKey>, IndexError> {
        let mut keys = self
            .identities
            .read()
            .keys()
            .map(|raw| PrivateStateKey::from_storage_key(raw))
            .collect::<Result<Vec<_>, _>>()?;
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{ContractAddress, SecretKey};

    fn identity(byte: u8) -> Identity {
        Identity::new(SecretKey::from_bytes([byte; 32]))
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = PrivateStateConfig::in_dir(dir.path());
        let key = PrivateStateKey::for_contract(ContractAddress::parse("0xabc").unwrap(), "alice");

        {
            let store = FilePrivateStateStore::open(&config).unwrap();
            store.set(&key, identity(7)).await.unwrap();
        }

        let reopened = FilePrivateStateStore::open(&config).unwrap();
        assert_eq!(reopened.get(&key).await.unwrap(), Some(identity(7)));
        assert_eq!(reopened.keys().await.unwrap(), vec![key]);
    }

    #[tokio::test]
    async fn test_second_open_fails_while_locked() {
        let dir = tempfile::tempdir().unwrap();
        let config = PrivateStateConfig::in_dir(dir.path());

        let _first = FilePrivateStateStore::open(&config).unwrap();
        let second = FilePrivateStateStore::open(&config);
        assert!(matches!(second, Err(IndexError::Storage(_))));
    }

    #[tokio::test]
    async fn test_document_is_hex_json() {
        let dir = tempfile::tempdir().unwrap();
        let config = PrivateStateConfig::in_dir(dir.path());
        let store = FilePrivateStateStore::open(&config).unwrap();

        store
            .set(&PrivateStateKey::shared("bboard"), identity(0xab))
            .await
            .unwrap();

        let raw = fs::read_to_string(store.document_path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["bboard"]["secret_key"], "ab".repeat(32));
    }

    #[tokio::test]
    async fn test_clear_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePrivateStateStore::open(&PrivateStateConfig::in_dir(dir.path())).unwrap();
        let a = PrivateStateKey::shared("a");
        let b = PrivateStateKey::shared("b");
        store.set(&a, identity(1)).await.unwrap();
        store.set(&b, identity(2)).await.unwrap();

        assert!(store.remove(&a).await.unwrap());
        assert!(!store.remove(&a).await.unwrap());
        store.clear().await.unwrap();

        assert!(store.keys().await.unwrap().is_empty());
        assert_eq!(store.get(&b).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = PrivateStateConfig::in_dir(dir.path());
        fs::write(config.document_path(), b"{not json").unwrap();

        let result = FilePrivateStateStore::open(&config);
        assert!(matches!(result, Err(IndexError::Storage(_))));
    }
}
