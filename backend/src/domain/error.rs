//! Account store error taxonomy.
//!
//! These errors are transport agnostic. Inbound adapters branch on
//! [`ErrorKind`] to pick a response (for example 404, 409, 400 or 503).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Failure category reported by the account store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No record matched the lookup key.
    NotFound,
    /// The write would violate a uniqueness invariant.
    Conflict,
    /// The caller supplied a disallowed value.
    InvalidArgument,
    /// The storage backend could not serve the request.
    StorageUnavailable,
}

impl ErrorKind {
    /// Stable snake_case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::InvalidArgument => "invalid_argument",
            Self::StorageUnavailable => "storage_unavailable",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by [`crate::domain::AccountStore`] operations.
///
/// # Examples
/// ```
/// use account_store::domain::{AccountStoreError, ErrorKind};
///
/// let err = AccountStoreError::conflict("email already registered");
/// assert_eq!(err.kind(), ErrorKind::Conflict);
/// assert!(err.is_conflict());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct AccountStoreError {
    kind: ErrorKind,
    message: String,
}

impl AccountStoreError {
    /// Create an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Convenience constructor for [`ErrorKind::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Convenience constructor for [`ErrorKind::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Convenience constructor for [`ErrorKind::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Convenience constructor for [`ErrorKind::StorageUnavailable`].
    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StorageUnavailable, message)
    }

    /// Failure category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable detail.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Whether no record matched.
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    /// Whether a uniqueness invariant rejected the write.
    pub fn is_conflict(&self) -> bool {
        self.kind == ErrorKind::Conflict
    }

    /// Whether the storage backend failed.
    pub fn is_storage_unavailable(&self) -> bool {
        self.kind == ErrorKind::StorageUnavailable
    }
}
