//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{
    AccountRepository, AccountRepositoryError, CascadeDeletion, UniqueIndex,
};
