//! Creation and update stamps shared by persisted records.

use chrono::{DateTime, Utc};

use super::Identity;

/// Who touched a record and when.
///
/// Records are created once and never updated through the service, so a new
/// trail carries identical creation and update stamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTrail {
    /// When the record was first stored.
    pub created_at: DateTime<Utc>,
    /// Identity that created the record.
    pub created_by: Identity,
    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
    /// Identity that last modified the record.
    pub updated_by: Identity,
}

impl AuditTrail {
    /// Stamp a freshly created record.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use weather_proxy::domain::{AuditTrail, Identity};
    ///
    /// let actor = Identity::new("ada@example.com").expect("valid identity");
    /// let now = Utc::now();
    /// let trail = AuditTrail::created(actor.clone(), now);
    /// assert_eq!(trail.updated_by, actor);
    /// assert_eq!(trail.updated_at, now);
    /// ```
    pub fn created(actor: Identity, at: DateTime<Utc>) -> Self {
        Self {
            created_at: at,
            created_by: actor.clone(),
            updated_at: at,
            updated_by: actor,
        }
    }
}
