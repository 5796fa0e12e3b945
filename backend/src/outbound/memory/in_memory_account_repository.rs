//! In-process `AccountRepository` adapter.
//!
//! Both collections sit behind one mutex, so every compound write (cascade
//! delete, read-compare-replace of preferences) observes and mutates a single
//! consistent snapshot. Suitable for tests and single-process deployments.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, CascadeDeletion, UniqueIndex,
};
use crate::domain::{Email, Preferences, PreferencesUpdate, Session, SessionToken, User};

use super::collection::DocumentCollection;

fn user_email(user: &User) -> &str {
    user.email().as_ref()
}

fn session_owner(session: &Session) -> &str {
    session.user_id().as_ref()
}

fn session_token(session: &Session) -> &str {
    session.token().as_ref()
}

struct Collections {
    users: DocumentCollection<User>,
    sessions: DocumentCollection<Session>,
}

impl Collections {
    fn new() -> Self {
        Self {
            users: DocumentCollection::new("users")
                .with_unique_index(UniqueIndex::UserEmail, user_email),
            sessions: DocumentCollection::new("sessions")
                .with_unique_index(UniqueIndex::SessionUserId, session_owner)
                .with_unique_index(UniqueIndex::SessionToken, session_token),
        }
    }
}

/// Account repository holding users and sessions in process memory.
///
/// Clones share the same underlying collections.
#[derive(Clone)]
pub struct InMemoryAccountRepository {
    inner: Arc<Mutex<Collections>>,
}

impl InMemoryAccountRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Collections::new())),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, AccountRepositoryError> {
        self.inner
            .lock()
            .map_err(|_| AccountRepositoryError::connection("in-memory store lock poisoned"))
    }

    /// Number of stored users.
    pub fn user_count(&self) -> Result<usize, AccountRepositoryError> {
        Ok(self.lock()?.users.len())
    }

    /// Number of stored sessions.
    pub fn session_count(&self) -> Result<usize, AccountRepositoryError> {
        Ok(self.lock()?.sessions.len())
    }
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryAccountRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryAccountRepository").finish_non_exhaustive()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn insert_user(&self, user: &User) -> Result<(), AccountRepositoryError> {
        let mut guard = self.lock()?;
        guard.users.insert(user.clone())?;
        debug!(collection = guard.users.name(), "inserted document");
        Ok(())
    }

    async fn find_user(&self, email: &Email) -> Result<Option<User>, AccountRepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .users
            .find_by(UniqueIndex::UserEmail, email.as_ref())
            .cloned())
    }

    async fn delete_user_cascade(
        &self,
        email: &Email,
    ) -> Result<CascadeDeletion, AccountRepositoryError> {
        let mut guard = self.lock()?;
        if guard
            .users
            .find_by(UniqueIndex::UserEmail, email.as_ref())
            .is_none()
        {
            return Ok(CascadeDeletion::default());
        }

        let sessions_removed = guard
            .sessions
            .delete_where(|session| session.user_id() == email);
        let users_removed = guard.users.delete_where(|user| user.email() == email);
        debug!(users_removed, sessions_removed, "cascade delete applied");
        Ok(CascadeDeletion {
            users_removed,
            sessions_removed,
        })
    }

    async fn replace_preferences(
        &self,
        email: &Email,
        preferences: &Preferences,
    ) -> Result<PreferencesUpdate, AccountRepositoryError> {
        let mut guard = self.lock()?;
        let outcome = guard
            .users
            .update_by(UniqueIndex::UserEmail, email.as_ref(), |user| {
                if user.preferences() == preferences {
                    PreferencesUpdate::Unchanged
                } else {
                    user.replace_preferences(preferences.clone());
                    PreferencesUpdate::Modified
                }
            })
            .unwrap_or(PreferencesUpdate::UserNotFound);
        Ok(outcome)
    }

    async fn insert_session(&self, session: &Session) -> Result<(), AccountRepositoryError> {
        let mut guard = self.lock()?;
        guard.sessions.insert(session.clone())?;
        debug!(collection = guard.sessions.name(), "inserted document");
        Ok(())
    }

    async fn find_session_by_user(
        &self,
        user_id: &Email,
    ) -> Result<Option<Session>, AccountRepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .sessions
            .find_by(UniqueIndex::SessionUserId, user_id.as_ref())
            .cloned())
    }

    async fn find_session_by_token(
        &self,
        token: &SessionToken,
    ) -> Result<Option<Session>, AccountRepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .sessions
            .find_by(UniqueIndex::SessionToken, token.as_ref())
            .cloned())
    }

    async fn delete_sessions(&self, user_id: &Email) -> Result<u64, AccountRepositoryError> {
        let mut guard = self.lock()?;
        Ok(guard
            .sessions
            .delete_where(|session| session.user_id() == user_id))
    }
}
