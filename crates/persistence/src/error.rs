//! Error types for the storage driver.
//!
//! Errors are split in two layers: [`StoreError`] is what a document-store
//! client reports, and [`DriverError`] is the taxonomy the ORM sees. Every
//! client failure reaches the caller unchanged inside [`DriverError::Store`].

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The error type returned by every driver operation.
#[derive(Error, Debug)]
pub enum DriverError {
    /// Malformed caller input, rejected before any request is issued.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// An update was attempted without the key it needs.
    #[error("cannot put a document in bucket '{bucket}' without a primary key")]
    MissingPrimaryKey { bucket: String },

    /// The targeted document does not exist.
    #[error("document not found: {bucket}/{id}")]
    NotFound { bucket: String, id: String },

    /// Any failure surfaced by the document-store client.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DriverError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        DriverError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Returns true if this is a [`DriverError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, DriverError::NotFound { .. })
    }
}

/// Errors reported by a [`DocumentStoreApi`](crate::core::DocumentStoreApi)
/// implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The request never produced a response (connection, TLS, timeout).
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The store answered with a non-success status.
    #[error("store returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The store's response could not be interpreted.
    #[error("failed to parse store response: {message}")]
    Parse { message: String },

    /// The store refused the request as malformed before executing it.
    #[error("invalid store request: {message}")]
    InvalidRequest { message: String },
}

/// Result alias for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

/// Result alias for client operations.
pub type StoreResult<T> = Result<T, StoreError>;
