//! Login session model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::{AccountValidationError, Email, validate_key};

/// Opaque bearer credential identifying a session.
///
/// The store neither issues nor verifies tokens; it only guarantees that a
/// token value is attached to at most one session. `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionToken(String);

impl SessionToken {
    /// Validate and construct a token.
    pub fn new(token: impl Into<String>) -> Result<Self, AccountValidationError> {
        validate_key("token", token.into()).map(Self)
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

impl From<SessionToken> for String {
    fn from(value: SessionToken) -> Self {
        value.0
    }
}

impl TryFrom<String> for SessionToken {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// An active login.
///
/// ## Invariants
/// - At most one session exists per `user_id`.
/// - At most one session exists per `token`.
///
/// `user_id` holds the owning user's [`Email`] by value. It is a back
/// reference only; deleting a session never touches the user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Session {
    user_id: Email,
    token: SessionToken,
    created_at: DateTime<Utc>,
}

impl Session {
    /// Start a session for `user_id`, stamped with the current time.
    pub fn new(user_id: Email, token: SessionToken) -> Self {
        Self::from_parts(user_id, token, Utc::now())
    }

    /// Rebuild a session loaded from storage.
    pub fn from_parts(user_id: Email, token: SessionToken, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            token,
            created_at,
        }
    }

    /// Email of the user owning this session.
    pub fn user_id(&self) -> &Email {
        &self.user_id
    }

    /// Bearer credential.
    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    /// When the session was opened.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
