//! SeaORM entities for the persisted schema.
//!
//! These declare the logical schema once; the provisioner in
//! [`crate::schema`] renders it to dialect-specific DDL.

pub mod org_group;
pub mod org_user;
pub mod organization;
