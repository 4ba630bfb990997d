//! User data model.
//!
//! A [`User`] is the local record for an [`Identity`] asserted by the
//! identity provider in front of the service. Users are created lazily on
//! first access and never deleted.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuditTrail;

/// Maximum accepted length for an identity reference.
pub const IDENTITY_MAX: usize = 256;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The user id was blank.
    #[error("user id must not be empty")]
    EmptyId,
    /// The user id was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The identity reference was blank.
    #[error("identity must not be empty")]
    EmptyIdentity,
    /// The identity carried surrounding whitespace.
    #[error("identity must not contain leading or trailing whitespace")]
    PaddedIdentity,
    /// The identity exceeded [`IDENTITY_MAX`].
    #[error("identity must be at most {max} characters")]
    IdentityTooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap a UUID read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Opaque reference to an authenticated principal.
///
/// The value is whatever the identity provider forwards (an email address, a
/// subject claim, ...). It is compared verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Validate and construct an [`Identity`].
    pub fn new(identity: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(identity.into())
    }

    fn from_owned(identity: String) -> Result<Self, UserValidationError> {
        if identity.trim().is_empty() {
            return Err(UserValidationError::EmptyIdentity);
        }
        if identity.trim() != identity {
            return Err(UserValidationError::PaddedIdentity);
        }
        if identity.chars().count() > IDENTITY_MAX {
            return Err(UserValidationError::IdentityTooLong { max: IDENTITY_MAX });
        }
        Ok(Self(identity))
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Identity> for String {
    fn from(value: Identity) -> Self {
        value.0
    }
}

impl TryFrom<String> for Identity {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Application user.
///
/// ## Invariants
/// - At most one user exists per [`Identity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    identity: Identity,
    audit: AuditTrail,
}

impl User {
    /// Build a user from validated components.
    pub fn new(id: UserId, identity: Identity, audit: AuditTrail) -> Self {
        Self {
            id,
            identity,
            audit,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Identity this record belongs to.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Creation and update stamps.
    pub fn audit(&self) -> &AuditTrail {
        &self.audit
    }
}
