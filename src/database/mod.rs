//! Database connection management.
//!
//! Wraps a SeaORM connection with pool settings from [`StoreConfig`] and
//! optional schema provisioning on connect.
//!
//! [`StoreConfig`]: crate::StoreConfig

pub mod connection;

pub use connection::DatabaseConnection;
pub use sea_orm;
