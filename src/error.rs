//! Store error types.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Errors that can occur during organization store operations.
#[derive(Debug, Error)]
pub enum OrgStoreError {
    /// An organization with this url prefix already exists.
    #[error("url prefix already taken: {url_prefix}")]
    UrlPrefixTaken {
        /// The prefix that is taken.
        url_prefix: String,
    },

    /// The user is already a member of the organization.
    #[error("user {email} is already a member of organization {org_id}")]
    AlreadyMember {
        /// The organization.
        org_id: i32,
        /// The duplicate member email.
        email: String,
    },

    /// The group is already linked to the organization.
    #[error("group {group_id} is already linked to organization {org_id}")]
    GroupAlreadyLinked {
        /// The organization.
        org_id: i32,
        /// The duplicate group.
        group_id: i32,
    },

    /// Any other backend or connection failure, propagated unchanged.
    #[error("database error: {0}")]
    Database(String),
}

impl OrgStoreError {
    /// Create a url-prefix-taken error.
    pub fn url_prefix_taken(url_prefix: impl Into<String>) -> Self {
        Self::UrlPrefixTaken {
            url_prefix: url_prefix.into(),
        }
    }

    /// Create an already-member error.
    pub fn already_member(org_id: i32, email: impl Into<String>) -> Self {
        Self::AlreadyMember {
            org_id,
            email: email.into(),
        }
    }

    /// Create a group-already-linked error.
    pub fn group_already_linked(org_id: i32, group_id: i32) -> Self {
        Self::GroupAlreadyLinked { org_id, group_id }
    }

    /// True if this error is one of the constraint-violation variants.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::UrlPrefixTaken { .. } | Self::AlreadyMember { .. } | Self::GroupAlreadyLinked { .. }
        )
    }

    /// Classify a SeaORM error from an insert: unique-constraint violations
    /// become `conflict`, anything else is wrapped as [`Database`].
    ///
    /// SeaORM's [`SqlErr`] normalizes the duplicate-key errors of all three
    /// backends, so callers never match on driver-specific codes.
    ///
    /// [`Database`]: OrgStoreError::Database
    pub(crate) fn from_insert_err(err: DbErr, conflict: Self) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => conflict,
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<DbErr> for OrgStoreError {
    fn from(err: DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Result type for organization store operations.
pub type Result<T> = std::result::Result<T, OrgStoreError>;
