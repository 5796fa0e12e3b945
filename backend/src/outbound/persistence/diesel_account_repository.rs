//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.
//!
//! Uniqueness is enforced by the `users_pkey`, `sessions_user_id_key` and
//! `sessions_token_key` constraints; the adapter never pre-checks. Every write
//! runs inside a transaction that first applies the pool's
//! [`WriteDurability`](super::WriteDurability) via `SET LOCAL`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::{AccountRepository, AccountRepositoryError, CascadeDeletion};
use crate::domain::{Email, Preferences, PreferencesUpdate, Session, SessionToken, User};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewSessionRow, NewUserRow, SessionRow, UserRow};
use super::pool::DbPool;
use super::schema::{sessions, users};

fn row_count(rows: usize) -> u64 {
    u64::try_from(rows).unwrap_or(u64::MAX)
}

/// Diesel-backed implementation of the `AccountRepository` port.
#[derive(Debug, Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn insert_user(&self, user: &User) -> Result<(), AccountRepositoryError> {
        let durability = self.pool.write_durability();
        let row = NewUserRow::from(user);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::sql_query(durability.set_local_statement())
                    .execute(conn)
                    .await?;
                diesel::insert_into(users::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_user(&self, email: &Email) -> Result<Option<User>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(User::try_from).transpose()
    }

    async fn delete_user_cascade(
        &self,
        email: &Email,
    ) -> Result<CascadeDeletion, AccountRepositoryError> {
        let durability = self.pool.write_durability();
        let key = email.as_ref();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // The user row is locked before sessions are touched, so a missing
        // user leaves the sessions table as it was.
        let removed = conn
            .transaction(|conn| {
                async move {
                    diesel::sql_query(durability.set_local_statement())
                        .execute(conn)
                        .await?;
                    let owner: Option<String> = users::table
                        .filter(users::email.eq(key))
                        .select(users::email)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    if owner.is_none() {
                        return Ok(CascadeDeletion::default());
                    }

                    let sessions_removed = diesel::delete(sessions::table)
                        .filter(sessions::user_id.eq(key))
                        .execute(conn)
                        .await?;
                    let users_removed = diesel::delete(users::table)
                        .filter(users::email.eq(key))
                        .execute(conn)
                        .await?;
                    Ok(CascadeDeletion {
                        users_removed: row_count(users_removed),
                        sessions_removed: row_count(sessions_removed),
                    })
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        debug!(
            users_removed = removed.users_removed,
            sessions_removed = removed.sessions_removed,
            "cascade delete committed"
        );
        Ok(removed)
    }

    async fn replace_preferences(
        &self,
        email: &Email,
        preferences: &Preferences,
    ) -> Result<PreferencesUpdate, AccountRepositoryError> {
        let durability = self.pool.write_durability();
        let key = email.as_ref();
        let document = preferences.to_value();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::sql_query(durability.set_local_statement())
                    .execute(conn)
                    .await?;
                let current: Option<Value> = users::table
                    .filter(users::email.eq(key))
                    .select(users::preferences)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;

                let Some(current) = current else {
                    return Ok(PreferencesUpdate::UserNotFound);
                };
                if current == document {
                    return Ok(PreferencesUpdate::Unchanged);
                }

                diesel::update(users::table.filter(users::email.eq(key)))
                    .set(users::preferences.eq(&document))
                    .execute(conn)
                    .await?;
                Ok(PreferencesUpdate::Modified)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn insert_session(&self, session: &Session) -> Result<(), AccountRepositoryError> {
        let durability = self.pool.write_durability();
        let row = NewSessionRow::from(session);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::sql_query(durability.set_local_statement())
                    .execute(conn)
                    .await?;
                diesel::insert_into(sessions::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_session_by_user(
        &self,
        user_id: &Email,
    ) -> Result<Option<Session>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<SessionRow> = sessions::table
            .filter(sessions::user_id.eq(user_id.as_ref()))
            .select(SessionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Session::try_from).transpose()
    }

    async fn find_session_by_token(
        &self,
        token: &SessionToken,
    ) -> Result<Option<Session>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<SessionRow> = sessions::table
            .filter(sessions::token.eq(token.as_ref()))
            .select(SessionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Session::try_from).transpose()
    }

    async fn delete_sessions(&self, user_id: &Email) -> Result<u64, AccountRepositoryError> {
        let durability = self.pool.write_durability();
        let key = user_id.as_ref();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = conn
            .transaction(|conn| {
                async move {
                    diesel::sql_query(durability.set_local_statement())
                        .execute(conn)
                        .await?;
                    diesel::delete(sessions::table)
                        .filter(sessions::user_id.eq(key))
                        .execute(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(row_count(deleted))
    }
}
