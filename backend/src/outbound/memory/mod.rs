//! In-process storage adapters.
//!
//! Collections live behind a single mutex and enforce their unique indexes on
//! insert, mirroring the guarantees of the PostgreSQL adapter.

mod collection;
mod in_memory_account_repository;

pub use in_memory_account_repository::InMemoryAccountRepository;
