//! Non-error results of single-entity writes.
//!
//! A key that matches nothing is not a storage fault. These types let callers
//! tell "nothing to do" apart from a failed write without inspecting errors.

/// Result of deleting a user together with their sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserDeletion {
    /// The user record was removed along with `sessions_removed` sessions.
    Deleted { sessions_removed: u64 },
    /// No user matched the email; nothing was removed.
    NotFound,
}

impl UserDeletion {
    /// Whether a user record was removed.
    pub fn is_deleted(self) -> bool {
        matches!(self, Self::Deleted { .. })
    }
}

/// Result of replacing a user's preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferencesUpdate {
    /// The stored document changed.
    Modified,
    /// The user exists and already held an identical document.
    Unchanged,
    /// No user matched the email.
    UserNotFound,
}

impl PreferencesUpdate {
    /// Whether the stored document was actually rewritten.
    pub fn is_modified(self) -> bool {
        self == Self::Modified
    }
}
