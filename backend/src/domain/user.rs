//! User account model.
//!
//! Users are keyed by [`Email`]. The store never re-validates the address
//! format; callers are expected to hand over addresses they have already
//! checked. Construction only rejects values that could never serve as a
//! lookup key: empty strings, values wrapped in whitespace, and values
//! holding a NUL character, which PostgreSQL text columns cannot store.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::Preferences;

/// Validation errors raised when constructing account identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    /// The value was empty once trimmed of whitespace.
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    /// The value carried leading or trailing whitespace.
    #[error("{field} must not have leading or trailing whitespace")]
    SurroundingWhitespace { field: &'static str },
    /// The value contained a NUL (`\0`) character.
    #[error("{field} must not contain NUL characters")]
    NulCharacter { field: &'static str },
}

pub(crate) fn validate_key(
    field: &'static str,
    value: String,
) -> Result<String, AccountValidationError> {
    if value.trim().is_empty() {
        return Err(AccountValidationError::Empty { field });
    }
    if value.trim() != value {
        return Err(AccountValidationError::SurroundingWhitespace { field });
    }
    if value.contains('\0') {
        return Err(AccountValidationError::NulCharacter { field });
    }
    Ok(value)
}

/// Declares a string newtype validated by [`validate_key`].
macro_rules! validated_key {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct the value from owned or borrowed input.
            pub fn new(value: impl Into<String>) -> Result<Self, AccountValidationError> {
                validate_key($field, value.into()).map(Self)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_ref())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = AccountValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

validated_key!(
    /// Business key identifying a user. Sessions reference their owner by
    /// this value.
    Email,
    "email"
);

validated_key!(
    /// Human readable account name.
    UserName,
    "name"
);

/// Opaque hashed credential material.
///
/// The store persists the value verbatim and never inspects it. The buffer is
/// wiped on drop and the value is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PasswordHash(Zeroizing<String>);

impl PasswordHash {
    /// Wrap already-hashed credential material.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(Zeroizing::new(hash.into()))
    }

    /// Borrow the stored hash for persistence adapters and verifiers.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

impl From<String> for PasswordHash {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<PasswordHash> for String {
    fn from(value: PasswordHash) -> Self {
        value.expose().to_owned()
    }
}

/// Registered account.
///
/// ## Invariants
/// - At most one user exists per [`Email`]; the store enforces this with a
///   unique index.
/// - `preferences` is always a JSON object, possibly empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    name: UserName,
    email: Email,
    #[serde(rename = "hashedpw")]
    password_hash: PasswordHash,
    #[serde(default)]
    preferences: Preferences,
}

impl User {
    /// Build a user with empty preferences.
    pub fn new(name: UserName, email: Email, password_hash: PasswordHash) -> Self {
        Self {
            name,
            email,
            password_hash,
            preferences: Preferences::default(),
        }
    }

    /// Fallible constructor accepting raw strings for the identifying fields.
    pub fn try_from_strings(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Result<Self, AccountValidationError> {
        Ok(Self::new(
            UserName::new(name)?,
            Email::new(email)?,
            PasswordHash::new(password_hash),
        ))
    }

    /// Replace the initial preferences.
    #[must_use]
    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Account name.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Unique business key.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Stored credential material.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Free-form user preferences.
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Name of the first stored field holding a NUL character, if any.
    ///
    /// Keys are checked on construction; the opaque hash and the preferences
    /// document are only checked here, before a write.
    pub fn field_with_nul(&self) -> Option<&'static str> {
        if self.password_hash.expose().contains('\0') {
            return Some("hashedpw");
        }
        self.preferences.contains_nul().then_some("preferences")
    }

    pub(crate) fn replace_preferences(&mut self, preferences: Preferences) {
        self.preferences = preferences;
    }
}

#[cfg(test)]
mod tests;
