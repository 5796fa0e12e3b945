//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Rows loaded from storage are revalidated
//! on the way back into domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use crate::domain::ports::AccountRepositoryError;
use crate::domain::{Email, PasswordHash, Preferences, Session, SessionToken, User, UserName};

use super::schema::{sessions, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub preferences: Value,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
    pub preferences: Value,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            email: user.email().as_ref(),
            name: user.name().as_ref(),
            password_hash: user.password_hash().expose(),
            preferences: user.preferences().to_value(),
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = AccountRepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let corrupted = |err: &dyn std::fmt::Display| {
            AccountRepositoryError::query(format!("corrupted user record: {err}"))
        };
        let email = Email::new(row.email).map_err(|err| corrupted(&err))?;
        let name = UserName::new(row.name).map_err(|err| corrupted(&err))?;
        let preferences =
            Preferences::try_from(row.preferences).map_err(|err| corrupted(&err))?;

        Ok(
            User::new(name, email, PasswordHash::new(row.password_hash))
                .with_preferences(preferences),
        )
    }
}

/// Row struct for reading from the sessions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SessionRow {
    pub user_id: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new session records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sessions)]
pub(crate) struct NewSessionRow<'a> {
    pub user_id: &'a str,
    pub token: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Session> for NewSessionRow<'a> {
    fn from(session: &'a Session) -> Self {
        Self {
            user_id: session.user_id().as_ref(),
            token: session.token().as_ref(),
            created_at: session.created_at(),
        }
    }
}

impl TryFrom<SessionRow> for Session {
    type Error = AccountRepositoryError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let corrupted = |err: &dyn std::fmt::Display| {
            AccountRepositoryError::query(format!("corrupted session record: {err}"))
        };
        let user_id = Email::new(row.user_id).map_err(|err| corrupted(&err))?;
        let token = SessionToken::new(row.token).map_err(|err| corrupted(&err))?;

        Ok(Session::from_parts(user_id, token, row.created_at))
    }
}
