//! Shared fixture builders for account store integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`; this
//! module keeps their domain fixtures consistent.

use account_store::domain::{Email, SessionToken, User};

/// Parses an email fixture.
pub fn email(raw: &str) -> Email {
    Email::new(raw).expect("valid email fixture")
}

/// Parses a token fixture.
pub fn token(raw: &str) -> SessionToken {
    SessionToken::new(raw).expect("valid token fixture")
}

/// Builds a user with empty preferences.
pub fn user(name: &str, raw_email: &str) -> User {
    User::try_from_strings(name, raw_email, "$argon2id$v=19$fixture").expect("valid user fixture")
}
