//! Account store library.
//!
//! User accounts and login sessions over a document-style store, with the
//! identity invariants (one user per email, one session per user, one session
//! per token) enforced by storage-level unique indexes.
//!
//! - [`domain`] holds the models, the [`domain::AccountStore`] service and the
//!   repository port.
//! - [`outbound`] holds the PostgreSQL and in-process adapters.
//! - [`config`] loads connection settings.

pub mod config;
pub mod domain;
pub mod outbound;
