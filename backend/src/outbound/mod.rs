//! Outbound adapters implementing domain ports for storage infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of [`crate::domain::ports::AccountRepository`]:
//!
//! - **persistence**: PostgreSQL-backed documents using Diesel ORM
//! - **memory**: in-process document collections with unique indexes
//!
//! Adapters are thin translators that convert between domain types and
//! storage representations. They contain no business logic.

pub mod memory;
pub mod persistence;
