//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. The unique
//! constraint names are part of the contract: error mapping resolves them
//! back to [`crate::domain::ports::UniqueIndex`].

diesel::table! {
    /// Registered accounts, keyed by email (`users_pkey`).
    users (email) {
        /// Login identifier, compared byte-for-byte.
        email -> Text,
        /// Display name.
        name -> Text,
        /// Opaque credential hash.
        password_hash -> Text,
        /// Free-form JSON object, replaced wholesale on update.
        preferences -> Jsonb,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Active logins. `user_id` and `token` each carry a unique constraint.
    sessions (id) {
        id -> Int8,
        /// Owning user's email. No foreign key; ownership is by value.
        user_id -> Text,
        /// Opaque bearer token.
        token -> Text,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, sessions);
