//! Session snapshot type.

use std::fmt;

use crate::tokens::{AccessToken, RefreshToken};

/// A snapshot of the persisted token pair.
///
/// Returned by [`SessionStore::get`](crate::SessionStore::get). A cleared
/// session has both fields absent. The snapshot is a copy; mutating it does
/// not touch the store.
#[derive(Clone, Default)]
pub struct Session {
    /// Short-lived credential attached to every outbound call.
    pub access: Option<AccessToken>,
    /// Longer-lived credential used only to mint a new access token.
    pub refresh: Option<RefreshToken>,
}

impl Session {
    /// An empty session, as after `clear` or before any login.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if neither token is present.
    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none()
    }
}

// Custom Debug impl that hides sensitive data
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access", &self.access.as_ref().map(|_| "[REDACTED]"))
            .field("refresh", &self.refresh.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_session_has_no_tokens() {
        let session = Session::empty();
        assert!(session.is_empty());
        assert!(session.access.is_none());
        assert!(session.refresh.is_none());
    }

    #[test]
    fn debug_redacts_present_tokens() {
        let session = Session {
            access: Some(AccessToken::new("secret-access")),
            refresh: Some(RefreshToken::new("secret-refresh")),
        };
        let debug = format!("{:?}", session);
        assert!(!debug.contains("secret"));
    }
}
