//! Account store service.
//!
//! [`AccountStore`] is the inbound surface of the crate: user and session
//! operations with a typed outcome for every case a caller might branch on.
//! It holds no state of its own; durability and isolation come from the
//! [`AccountRepository`] adapter it wraps.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::{AccountRepository, AccountRepositoryError, UniqueIndex};
use crate::domain::{
    AccountStoreError, Email, Preferences, PreferencesUpdate, Session, SessionToken, StoreResult,
    User, UserDeletion,
};

/// User and session operations over a single storage connection.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use account_store::domain::{AccountStore, User};
/// use account_store::outbound::memory::InMemoryAccountRepository;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = AccountStore::new(Arc::new(InMemoryAccountRepository::new()));
/// let user = User::try_from_strings("Ada", "ada@example.com", "hash").unwrap();
///
/// store.add_user(&user).await.unwrap();
/// let err = store.add_user(&user).await.unwrap_err();
/// assert!(err.is_conflict());
/// # });
/// ```
#[derive(Debug)]
pub struct AccountStore<R> {
    repository: Arc<R>,
}

impl<R> Clone for AccountStore<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> AccountStore<R> {
    /// Create a store over the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R> AccountStore<R>
where
    R: AccountRepository,
{
    fn map_repository_error(error: AccountRepositoryError) -> AccountStoreError {
        match error {
            AccountRepositoryError::Connection { message } => {
                AccountStoreError::storage_unavailable(format!("storage unreachable: {message}"))
            }
            AccountRepositoryError::Query { message } => {
                AccountStoreError::storage_unavailable(format!("storage error: {message}"))
            }
            AccountRepositoryError::Duplicate { index } => Self::conflict_for(index),
        }
    }

    fn conflict_for(index: UniqueIndex) -> AccountStoreError {
        let message = match index {
            UniqueIndex::UserEmail => "a user with this email already exists",
            UniqueIndex::SessionUserId => "a session already exists for this user",
            UniqueIndex::SessionToken => "session token is already in use",
        };
        AccountStoreError::conflict(message)
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the hash or preferences hold a NUL character;
    /// `Conflict` when the email is already registered; `StorageUnavailable`
    /// when the write could not be performed.
    pub async fn add_user(&self, user: &User) -> StoreResult<()> {
        info!(email = %user.email(), "adding user");
        if let Some(field) = user.field_with_nul() {
            return Err(AccountStoreError::invalid_argument(format!(
                "{field} must not contain NUL characters"
            )));
        }
        self.repository.insert_user(user).await.map_err(|err| {
            let mapped = Self::map_repository_error(err);
            if mapped.is_conflict() {
                warn!(email = %user.email(), "rejected duplicate user");
            }
            mapped
        })
    }

    /// Fetch a user by email.
    ///
    /// # Errors
    ///
    /// `NotFound` when no user has this email; `StorageUnavailable` otherwise.
    pub async fn get_user(&self, email: &Email) -> StoreResult<User> {
        info!(%email, "fetching user");
        self.repository
            .find_user(email)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| AccountStoreError::not_found("no user with this email"))
    }

    /// Delete a user and every session they own in one atomic write.
    ///
    /// A user without sessions is deleted normally. When no user matched,
    /// [`UserDeletion::NotFound`] is returned rather than an error.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` when the transaction failed; nothing is removed
    /// in that case.
    pub async fn delete_user(&self, email: &Email) -> StoreResult<UserDeletion> {
        info!(%email, "deleting user");
        let removed = self
            .repository
            .delete_user_cascade(email)
            .await
            .map_err(Self::map_repository_error)?;

        if removed.users_removed == 0 {
            info!(%email, "no user to delete");
            return Ok(UserDeletion::NotFound);
        }

        Ok(UserDeletion::Deleted {
            sessions_removed: removed.sessions_removed,
        })
    }

    /// Replace a user's preferences wholesale.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `preferences` is `None` or holds a NUL
    /// character; stored data is left untouched. `StorageUnavailable` when
    /// the write failed.
    pub async fn update_user_preferences(
        &self,
        email: &Email,
        preferences: Option<&Preferences>,
    ) -> StoreResult<PreferencesUpdate> {
        info!(%email, "updating user preferences");
        let Some(preferences) = preferences else {
            return Err(AccountStoreError::invalid_argument(
                "preferences must be provided",
            ));
        };
        if preferences.contains_nul() {
            return Err(AccountStoreError::invalid_argument(
                "preferences must not contain NUL characters",
            ));
        }

        self.repository
            .replace_preferences(email, preferences)
            .await
            .map_err(Self::map_repository_error)
    }

    /// Open a session for `user_id` identified by `token`.
    ///
    /// The insert is guarded by unique indexes on both keys, so concurrent
    /// callers racing on the same user or token see exactly one success.
    ///
    /// # Errors
    ///
    /// `Conflict` when the user already has a session or the token is taken;
    /// `StorageUnavailable` when the write failed.
    pub async fn create_session(&self, user_id: &Email, token: SessionToken) -> StoreResult<Session> {
        info!(%user_id, "creating session");
        let session = Session::new(user_id.clone(), token);
        match self.repository.insert_session(&session).await {
            Ok(()) => Ok(session),
            Err(err) => {
                let mapped = Self::map_repository_error(err);
                if mapped.is_conflict() {
                    warn!(%user_id, reason = mapped.message(), "rejected session");
                }
                Err(mapped)
            }
        }
    }

    /// Fetch the session owned by `user_id`.
    ///
    /// # Errors
    ///
    /// `NotFound` when the user has no session; `StorageUnavailable` otherwise.
    pub async fn get_user_session(&self, user_id: &Email) -> StoreResult<Session> {
        info!(%user_id, "fetching user session");
        self.repository
            .find_session_by_user(user_id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| AccountStoreError::not_found("no session for this user"))
    }

    /// Resolve a bearer token to its session.
    ///
    /// # Errors
    ///
    /// `NotFound` when no session carries the token; `StorageUnavailable`
    /// otherwise.
    pub async fn get_session_by_token(&self, token: &SessionToken) -> StoreResult<Session> {
        info!("resolving session token");
        self.repository
            .find_session_by_token(token)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| AccountStoreError::not_found("no session for this token"))
    }

    /// Remove every session owned by `user_id`.
    ///
    /// Idempotent: removing zero sessions succeeds and returns `0`.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` when the delete failed.
    pub async fn delete_user_sessions(&self, user_id: &Email) -> StoreResult<u64> {
        info!(%user_id, "deleting user sessions");
        self.repository
            .delete_sessions(user_id)
            .await
            .map_err(Self::map_repository_error)
    }
}

#[cfg(test)]
#[path = "account_store_tests.rs"]
mod tests;
