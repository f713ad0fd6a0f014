//! Filesystem session store.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use refetch_core::error::StoreError;
use refetch_core::{AccessToken, RefreshToken, Result, Session, SessionStore};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stored session data.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(skip_serializing_if = "Option::is_none")]
    access: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh: Option<String>,
}

/// A [`SessionStore`] persisting tokens to a JSON file.
///
/// The file holds the two entries `access` and `refresh`. A missing file is
/// an empty session; `clear` removes the file. An internal mutex keeps
/// get/set/clear atomic with respect to each other, so a reader never
/// observes a half-written token pair. On Unix the file is written with
/// `0600` permissions.
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    /// Create a store backed by the given file path.
    ///
    /// Parent directories must already exist; the file itself is created
    /// on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    /// The file path this store writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StoredSession> {
        if !self.path.exists() {
            return Ok(StoredSession::default());
        }

        let json = fs::read_to_string(&self.path).map_err(StoreError::from)?;
        let stored = serde_json::from_str(&json).map_err(|e| StoreError::Corrupt {
            message: e.to_string(),
        })?;
        Ok(stored)
    }

    fn save(&self, stored: &StoredSession) -> Result<()> {
        let json = serde_json::to_string_pretty(stored).map_err(|e| StoreError::Corrupt {
            message: e.to_string(),
        })?;

        fs::write(&self.path, &json).map_err(StoreError::from)?;

        // Set restrictive permissions (Unix only)
        #[cfg(unix)]
        {
            let mut perms = fs::metadata(&self.path)
                .map_err(StoreError::from)?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms).map_err(StoreError::from)?;
        }

        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileStore {
    async fn get(&self) -> Result<Session> {
        let _guard = self.lock.lock().unwrap();
        let stored = self.load()?;
        Ok(Session {
            access: stored.access.map(AccessToken::new),
            refresh: stored.refresh.map(RefreshToken::new),
        })
    }

    async fn set_access(&self, access: AccessToken) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        let mut stored = self.load()?;
        stored.access = Some(access.as_str().to_string());
        self.save(&stored)
    }

    async fn set_tokens(&self, access: AccessToken, refresh: Option<RefreshToken>) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        let mut stored = self.load()?;
        stored.access = Some(access.as_str().to_string());
        if let Some(refresh) = refresh {
            stored.refresh = Some(refresh.as_str().to_string());
        }
        self.save(&stored)
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock().unwrap();

        if self.path.exists() {
            debug!(path = %self.path.display(), "removing session file");
            fs::remove_file(&self.path).map_err(StoreError::from)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileStore {
        FileStore::new(dir.path().join("session.json"))
    }

    #[tokio::test]
    async fn missing_file_is_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.get().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn tokens_round_trip_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileStore::new(&path);
        store
            .set_tokens(AccessToken::new("A1"), Some(RefreshToken::new("R1")))
            .await
            .unwrap();

        // A fresh instance reads the same pair back.
        let reopened = FileStore::new(&path);
        let session = reopened.get().await.unwrap();
        assert_eq!(session.access.unwrap().as_str(), "A1");
        assert_eq!(session.refresh.unwrap().as_str(), "R1");
    }

    #[tokio::test]
    async fn unrotated_refresh_token_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store
            .set_tokens(AccessToken::new("A1"), Some(RefreshToken::new("R1")))
            .await
            .unwrap();
        store
            .set_tokens(AccessToken::new("A2"), None)
            .await
            .unwrap();

        let session = store.get().await.unwrap();
        assert_eq!(session.access.unwrap().as_str(), "A2");
        assert_eq!(session.refresh.unwrap().as_str(), "R1");
    }

    #[tokio::test]
    async fn clear_removes_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store
            .set_tokens(AccessToken::new("A1"), Some(RefreshToken::new("R1")))
            .await
            .unwrap();
        assert!(store.path().exists());

        store.clear().await.unwrap();
        assert!(!store.path().exists());

        // Safe to call when already empty.
        store.clear().await.unwrap();
        assert!(store.get().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        fs::write(store.path(), "not json").unwrap();
        assert!(store.get().await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn session_file_has_restrictive_permissions() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.set_access(AccessToken::new("A1")).await.unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
