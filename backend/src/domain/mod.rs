//! Domain primitives, ports and the account store service.
//!
//! Purpose: define the strongly typed account and session records, the
//! error taxonomy callers branch on, and the [`AccountStore`] operations
//! built on the [`ports::AccountRepository`] boundary.
//!
//! Public surface:
//! - `User`, `Email`, `UserName`, `PasswordHash`: account records.
//! - `Session`, `SessionToken`: login records.
//! - `Preferences`: free-form preferences document.
//! - `AccountStoreError`, `ErrorKind`: failure taxonomy.
//! - `UserDeletion`, `PreferencesUpdate`: non-fatal write outcomes.

pub mod account_store;
pub mod error;
pub mod outcome;
pub mod ports;
pub mod preferences;
pub mod session;
pub mod user;

pub use self::account_store::AccountStore;
pub use self::error::{AccountStoreError, ErrorKind};
pub use self::outcome::{PreferencesUpdate, UserDeletion};
pub use self::preferences::{Preferences, PreferencesShapeError};
pub use self::session::{Session, SessionToken};
pub use self::user::{AccountValidationError, Email, PasswordHash, User, UserName};

/// Result alias for account store operations.
pub type StoreResult<T> = Result<T, AccountStoreError>;
