//! PostgreSQL persistence adapter using Diesel ORM.
//!
//! [`DieselAccountRepository`] implements the account repository port over a
//! `diesel-async` connection pooled by `bb8`. Row structs (`models.rs`) and
//! schema definitions (`schema.rs`) are internal and never reach the domain.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use account_store::domain::AccountStore;
//! use account_store::outbound::persistence::{DbPool, DieselAccountRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/accounts")).await?;
//! let store = AccountStore::new(Arc::new(DieselAccountRepository::new(pool)));
//! # let _ = store;
//! # Ok(())
//! # }
//! ```

mod diesel_account_repository;
mod diesel_error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError, WriteDurability};
