//! refetch-core - Core types and traits for the refetch toolkit.

pub mod error;
pub mod memory;
pub mod session;
pub mod tokens;
pub mod traits;
pub mod types;

pub use error::Error;
pub use memory::MemoryStore;
pub use session::Session;
pub use tokens::{AccessToken, RefreshToken};
pub use traits::{Notice, Notifier, NullNotifier, SessionStore};
pub use types::BaseUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
