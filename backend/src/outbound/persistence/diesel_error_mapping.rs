//! Diesel and pool error mapping for the account repository.
//!
//! Unique violations are resolved to the [`UniqueIndex`] they hit. PostgreSQL
//! reports the constraint name directly; when a driver omits it, the message
//! is scanned for a known constraint instead.

use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{AccountRepositoryError, UniqueIndex};

use super::pool::PoolError;

/// Map pool errors to account repository connection errors.
pub(crate) fn map_pool_error(error: PoolError) -> AccountRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            AccountRepositoryError::connection(message)
        }
    }
}

fn violated_index(info: &(dyn DatabaseErrorInformation + Send + Sync)) -> Option<UniqueIndex> {
    info.constraint_name()
        .and_then(UniqueIndex::from_constraint)
        .or_else(|| {
            UniqueIndex::ALL
                .into_iter()
                .find(|index| info.message().contains(index.constraint_name()))
        })
}

/// Map Diesel errors to account repository errors.
pub(crate) fn map_diesel_error(error: DieselError) -> AccountRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => AccountRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => AccountRepositoryError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            match violated_index(&*info) {
                Some(index) => AccountRepositoryError::duplicate(index),
                None => AccountRepositoryError::query("unique violation on unknown constraint"),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => {
            AccountRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
            AccountRepositoryError::query("transaction aborted by a concurrent write")
        }
        DieselError::DatabaseError(_, info) => {
            AccountRepositoryError::query(format!("database error: {}", info.message()))
        }
        _ => AccountRepositoryError::query("database error"),
    }
}
