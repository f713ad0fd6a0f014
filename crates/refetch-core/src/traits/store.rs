//! Session store trait.

use async_trait::async_trait;

use crate::session::Session;
use crate::tokens::{AccessToken, RefreshToken};
use crate::Result;

/// Owner of the persisted access/refresh token pair.
///
/// The store is the only shared mutable state in the pipeline: the request
/// pipeline reads tokens through [`get`](SessionStore::get) and writes them
/// back only through the mutation operations here, never caching its own
/// copy across calls.
///
/// Implementations must make each operation atomic with respect to the
/// others: a `get` never observes a half-written token pair, and mutations
/// are immediately visible to subsequent `get` calls.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the current token pair (fields absent if never set or
    /// cleared).
    async fn get(&self) -> Result<Session>;

    /// Replace the access token, leaving the refresh token untouched.
    async fn set_access(&self, access: AccessToken) -> Result<()>;

    /// Replace the access token and, when the server rotated it, the
    /// refresh token.
    ///
    /// `refresh` is optional because the refresh endpoint may or may not
    /// rotate the refresh token; `None` keeps the stored one.
    async fn set_tokens(&self, access: AccessToken, refresh: Option<RefreshToken>) -> Result<()>;

    /// Idempotently remove both tokens; safe to call when already empty.
    async fn clear(&self) -> Result<()>;
}
