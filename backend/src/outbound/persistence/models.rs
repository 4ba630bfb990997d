//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{sites, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub identity: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub identity: &'a str,
    pub created_at: DateTime<Utc>,
    pub created_by: &'a str,
    pub updated_at: DateTime<Utc>,
    pub updated_by: &'a str,
}

/// Row struct for reading from the sites table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SiteRow {
    pub key: String,
    pub path: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

/// Insertable struct for creating site records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sites)]
pub(crate) struct NewSiteRow<'a> {
    pub key: &'a str,
    pub path: &'a str,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub created_by: &'a str,
    pub updated_at: DateTime<Utc>,
    pub updated_by: &'a str,
}
