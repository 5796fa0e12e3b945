//! Port for account and session persistence.
//!
//! The [`AccountRepository`] trait is the storage contract behind
//! [`crate::domain::AccountStore`]. One adapter owns both the `users` and
//! `sessions` collections so compound writes can share a transaction.
//!
//! # Uniqueness
//!
//! Adapters must enforce the three [`UniqueIndex`] constraints at write time
//! and report a violation as [`AccountRepositoryError::Duplicate`]. Callers
//! never pre-check for existing records.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{Email, Preferences, PreferencesUpdate, Session, SessionToken, User};

use super::define_port_error;

/// Storage-level uniqueness constraint guarding an identity invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueIndex {
    /// One user per email.
    UserEmail,
    /// One session per user.
    SessionUserId,
    /// One session per bearer token.
    SessionToken,
}

impl UniqueIndex {
    /// Every index, in declaration order.
    pub const ALL: [Self; 3] = [Self::UserEmail, Self::SessionUserId, Self::SessionToken];

    /// Database constraint backing this index.
    pub fn constraint_name(self) -> &'static str {
        match self {
            Self::UserEmail => "users_pkey",
            Self::SessionUserId => "sessions_user_id_key",
            Self::SessionToken => "sessions_token_key",
        }
    }

    /// Resolve a database constraint name back to its index.
    pub fn from_constraint(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|index| index.constraint_name() == name)
    }
}

impl fmt::Display for UniqueIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UserEmail => "users.email",
            Self::SessionUserId => "sessions.user_id",
            Self::SessionToken => "sessions.token",
        })
    }
}

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// A unique index rejected the write.
        Duplicate { index: UniqueIndex } => "unique index {index} rejected the write",
    }
}

/// Row counts removed by [`AccountRepository::delete_user_cascade`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeDeletion {
    /// User records removed (zero or one).
    pub users_removed: u64,
    /// Sessions whose `user_id` matched the email.
    pub sessions_removed: u64,
}

/// Port for account and session storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new user.
    ///
    /// Fails with `Duplicate { index: UserEmail }` when the email is taken.
    async fn insert_user(&self, user: &User) -> Result<(), AccountRepositoryError>;

    /// Fetch a user by email.
    async fn find_user(&self, email: &Email) -> Result<Option<User>, AccountRepositoryError>;

    /// Remove every session owned by `email`, then the user record, as one
    /// atomic unit.
    ///
    /// Either both deletes are committed or neither is. When no user matches,
    /// nothing is removed and both counts are zero.
    async fn delete_user_cascade(
        &self,
        email: &Email,
    ) -> Result<CascadeDeletion, AccountRepositoryError>;

    /// Replace the stored preferences document wholesale.
    async fn replace_preferences(
        &self,
        email: &Email,
        preferences: &Preferences,
    ) -> Result<PreferencesUpdate, AccountRepositoryError>;

    /// Insert a new session in a single guarded write.
    ///
    /// Fails with `Duplicate` naming `SessionUserId` or `SessionToken` when
    /// either key is already in use.
    async fn insert_session(&self, session: &Session) -> Result<(), AccountRepositoryError>;

    /// Fetch the session owned by `user_id`.
    async fn find_session_by_user(
        &self,
        user_id: &Email,
    ) -> Result<Option<Session>, AccountRepositoryError>;

    /// Fetch the session carrying `token`.
    async fn find_session_by_token(
        &self,
        token: &SessionToken,
    ) -> Result<Option<Session>, AccountRepositoryError>;

    /// Remove all sessions owned by `user_id`, returning how many went away.
    async fn delete_sessions(&self, user_id: &Email) -> Result<u64, AccountRepositoryError>;
}
