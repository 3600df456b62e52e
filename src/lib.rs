//! Orgstore - multi-tenant organization records over a relational store
//!
//! Orgstore owns three tables (organizations, their member users, and their
//! associated groups), provisions them idempotently on any of three SQL
//! backends, and exposes the membership and lookup queries an access-control
//! layer needs.
//!
//! # Features
//!
//! - **Three backends**: SQLite (embedded file), MySQL and Postgres through
//!   SeaORM; the logical schema is declared once and rendered per dialect
//! - **Atomic creation**: an organization and its first staff user are
//!   created in a single transaction
//! - **Typed errors**: constraint violations surface as distinct variants,
//!   lookups return `Option` instead of errors
//! - **Testing**: in-memory test databases with the schema pre-provisioned
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use orgstore::{DatabaseConnection, OrgStore, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> orgstore::Result<()> {
//!     let config = StoreConfig::from_env().expect("DATABASE_URL not set");
//!     let db = DatabaseConnection::connect(&config).await?;
//!     let store = OrgStore::new(db.into_inner());
//!
//!     let org_id = store.create_org("Acme", "acme", "alice@acme.com").await?;
//!     assert!(store.is_org_staff(org_id, "alice@acme.com").await?);
//!     Ok(())
//! }
//! ```

mod config;
pub mod database;
pub mod entity;
mod error;
mod pagination;
pub mod schema;
mod store;
pub mod testing;
mod utils;

// Configuration exports
pub use config::{redact_database_url, StoreConfig};

// Database exports
pub use database::DatabaseConnection;

// Error exports
pub use error::{OrgStoreError, Result};

// Pagination exports
pub use pagination::Page;

// Schema exports
pub use schema::ensure_schema;

// Store exports
pub use store::{OrgMembership, OrgStore, Organization};
