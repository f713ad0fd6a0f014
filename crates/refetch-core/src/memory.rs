//! In-memory session store.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::session::Session;
use crate::tokens::{AccessToken, RefreshToken};
use crate::traits::SessionStore;
use crate::Result;

/// An in-memory [`SessionStore`] for tests and ephemeral processes.
///
/// Tokens live behind an `RwLock`, so every operation is atomic with
/// respect to the others and nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    tokens: RwLock<Session>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated from a session snapshot, as after a
    /// login performed elsewhere.
    pub fn from_session(session: Session) -> Self {
        Self {
            tokens: RwLock::new(session),
        }
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self) -> Result<Session> {
        let tokens = self.tokens.read().unwrap();
        Ok(tokens.clone())
    }

    async fn set_access(&self, access: AccessToken) -> Result<()> {
        let mut tokens = self.tokens.write().unwrap();
        tokens.access = Some(access);
        Ok(())
    }

    async fn set_tokens(&self, access: AccessToken, refresh: Option<RefreshToken>) -> Result<()> {
        let mut tokens = self.tokens.write().unwrap();
        tokens.access = Some(access);
        if let Some(refresh) = refresh {
            tokens.refresh = Some(refresh);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut tokens = self.tokens.write().unwrap();
        *tokens = Session::empty();
        Ok(())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MemoryStore {
        MemoryStore::from_session(Session {
            access: Some(AccessToken::new("A1")),
            refresh: Some(RefreshToken::new("R1")),
        })
    }

    #[tokio::test]
    async fn starts_empty() {
        let store = MemoryStore::new();
        assert!(store.get().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn set_tokens_replaces_access() {
        let store = seeded();

        store
            .set_tokens(AccessToken::new("A2"), None)
            .await
            .unwrap();

        let session = store.get().await.unwrap();
        assert_eq!(session.access.unwrap().as_str(), "A2");
        // Refresh token untouched when the server did not rotate it
        assert_eq!(session.refresh.unwrap().as_str(), "R1");
    }

    #[tokio::test]
    async fn set_tokens_rotates_refresh_when_present() {
        let store = seeded();

        store
            .set_tokens(AccessToken::new("A2"), Some(RefreshToken::new("R2")))
            .await
            .unwrap();

        let session = store.get().await.unwrap();
        assert_eq!(session.refresh.unwrap().as_str(), "R2");
    }

    #[tokio::test]
    async fn set_access_leaves_refresh() {
        let store = seeded();

        store.set_access(AccessToken::new("A2")).await.unwrap();

        let session = store.get().await.unwrap();
        assert_eq!(session.access.unwrap().as_str(), "A2");
        assert_eq!(session.refresh.unwrap().as_str(), "R1");
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let store = seeded();

        store.clear().await.unwrap();
        store.clear().await.unwrap();

        assert!(store.get().await.unwrap().is_empty());
    }
}
