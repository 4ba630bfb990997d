//! PostgreSQL-backed `SiteRepository` implementation using Diesel ORM.
//!
//! Conditional inserts use `ON CONFLICT DO NOTHING` on the primary key, so key
//! uniqueness holds across concurrent registrations and across processes.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{InsertOutcome, SitePersistenceError, SiteRepository};
use crate::domain::{AuditTrail, Identity, Site, SiteKey, SitePath, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewSiteRow, SiteRow};
use super::pool::{DbPool, PoolError};
use super::schema::sites;

/// Diesel-backed implementation of the [`SiteRepository`] port.
#[derive(Clone)]
pub struct DieselSiteRepository {
    pool: DbPool,
}

impl DieselSiteRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SitePersistenceError {
    map_basic_pool_error(error, SitePersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> SitePersistenceError {
    map_basic_diesel_error(
        error,
        SitePersistenceError::query,
        SitePersistenceError::connection,
    )
}

fn row_to_site(row: SiteRow) -> Result<Site, SitePersistenceError> {
    let SiteRow {
        key,
        path,
        owner_id,
        created_at,
        created_by,
        updated_at,
        updated_by,
    } = row;
    let key = SiteKey::new(key)
        .map_err(|err| SitePersistenceError::query(format!("invalid site key in database: {err}")))?;
    let path = SitePath::parse(path).map_err(|err| {
        SitePersistenceError::query(format!("invalid site path in database: {err}"))
    })?;
    let audit = AuditTrail {
        created_at,
        created_by: parse_actor(created_by)?,
        updated_at,
        updated_by: parse_actor(updated_by)?,
    };
    Ok(Site::new(key, path, UserId::from_uuid(owner_id), audit))
}

fn parse_actor(raw: String) -> Result<Identity, SitePersistenceError> {
    Identity::new(raw)
        .map_err(|err| SitePersistenceError::query(format!("invalid actor in database: {err}")))
}

#[async_trait]
impl SiteRepository for DieselSiteRepository {
    async fn find_by_key(&self, key: &SiteKey) -> Result<Option<Site>, SitePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<SiteRow> = sites::table
            .filter(sites::key.eq(key.as_ref()))
            .select(SiteRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_site).transpose()
    }

    async fn insert_if_absent(&self, site: &Site) -> Result<InsertOutcome, SitePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let audit = site.audit();
        let row = NewSiteRow {
            key: site.key().as_ref(),
            path: site.path().as_ref(),
            owner_id: *site.owner().as_uuid(),
            created_at: audit.created_at,
            created_by: audit.created_by.as_ref(),
            updated_at: audit.updated_at,
            updated_by: audit.updated_by.as_ref(),
        };

        let inserted = diesel::insert_into(sites::table)
            .values(&row)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(if inserted == 0 {
            InsertOutcome::AlreadyExists
        } else {
            InsertOutcome::Inserted
        })
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Site>, SitePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<SiteRow> = sites::table
            .filter(sites::owner_id.eq(owner.as_uuid()))
            .order((sites::created_at.asc(), sites::key.asc()))
            .select(SiteRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_site).collect()
    }
}
