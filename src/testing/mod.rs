//! Testing utilities.
//!
//! Provides test databases with the organization schema pre-provisioned:
//! SQLite in-memory by default, PostgreSQL when matching production matters.
//!
//! # Example
//!
//! ```rust,ignore
//! use orgstore::{testing::TestDb, OrgStore};
//!
//! #[tokio::test]
//! async fn test_create() {
//!     let db = TestDb::new().await.expect("test database");
//!     let store = OrgStore::new(db.connection());
//!
//!     let org_id = store.create_org("Acme", "acme", "a@x.com").await.unwrap();
//!     assert_eq!(org_id, 1);
//! }
//! ```

mod database;

pub use database::TestDb;
