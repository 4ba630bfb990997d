//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Local records for authenticated identities.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Identity reference forwarded by the identity provider; unique.
        identity -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Identity that created the record.
        created_by -> Varchar,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
        /// Identity that last modified the record.
        updated_by -> Varchar,
    }
}

diesel::table! {
    /// Registered weather-station sites.
    sites (key) {
        /// Primary key: SHA-224 digest prefix of `path`.
        key -> Varchar,
        /// Base URL under which the station publishes its files.
        path -> Text,
        /// Owning user.
        owner_id -> Uuid,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Identity that created the record.
        created_by -> Varchar,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
        /// Identity that last modified the record.
        updated_by -> Varchar,
    }
}

diesel::joinable!(sites -> users (owner_id));
diesel::allow_tables_to_appear_in_same_query!(sites, users);
