//! Error types for the refetch libraries.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, storage, and input validation errors.

use thiserror::Error;

/// The unified error type for refetch operations.
///
/// This error type covers all possible failure modes in the libraries,
/// with explicit variants to allow callers to handle specific cases.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (missing credentials, expired session).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Session storage errors (I/O, corrupt session file).
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Input validation errors (invalid base URL, header value).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
///
/// Both variants are raised only after the pipeline has emitted a
/// user-facing notice; non-401 HTTP responses are never mapped here.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No access token and no usable refresh token at call start.
    #[error("not authenticated")]
    Unauthenticated,

    /// A 401 was received and the refresh attempt failed; the session
    /// has been cleared.
    #[error("session expired")]
    SessionExpired,

    /// The refresh endpoint rejected the refresh token.
    #[error("refresh token rejected (HTTP {status})")]
    RefreshRejected { status: u16 },
}

/// Session storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the persisted session failed.
    #[error("session storage I/O failed: {message}")]
    Io { message: String },

    /// The persisted session could not be parsed.
    #[error("session storage corrupt: {message}")]
    Corrupt { message: String },
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io {
            message: err.to_string(),
        }
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid base URL format.
    #[error("invalid base URL '{value}': {reason}")]
    BaseUrl { value: String, reason: String },

    /// Invalid header name or value.
    #[error("invalid header '{name}': {reason}")]
    Header { name: String, reason: String },

    /// Request body could not be serialized.
    #[error("invalid body: {reason}")]
    Body { reason: String },
}
