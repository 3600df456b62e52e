use crate::config::{redact_database_url, StoreConfig};
use crate::error::{OrgStoreError, Result};
use crate::schema;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend,
    DatabaseConnection as SeaOrmConnection,
};
use std::time::Duration;

/// Wrapper around SeaORM database connection
#[derive(Clone)]
pub struct DatabaseConnection {
    pub conn: SeaOrmConnection,
}

impl DatabaseConnection {
    /// Create a new database connection from config.
    ///
    /// When `config.auto_provision` is set, the organization schema is
    /// ensured before the connection is returned.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let mut opt = ConnectOptions::new(&config.url);
        opt.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Duration::from_secs(config.idle_timeout))
            .sqlx_logging(true);

        let conn = Database::connect(opt)
            .await
            .map_err(|e| OrgStoreError::Database(format!("Failed to connect to database: {}", e)))?;

        tracing::info!(
            url = %redact_database_url(&config.url),
            backend = ?conn.get_database_backend(),
            "Database connected with {} max connections",
            config.max_connections
        );

        if config.auto_provision {
            schema::ensure_schema(&conn).await?;
        }

        Ok(Self { conn })
    }

    /// The SQL dialect this connection speaks.
    pub fn backend(&self) -> DatabaseBackend {
        self.conn.get_database_backend()
    }

    /// Ping the database to check connection health
    pub async fn ping(&self) -> Result<()> {
        self.conn
            .ping()
            .await
            .map_err(|e| OrgStoreError::Database(format!("Database ping failed: {}", e)))
    }

    /// Close the database connection
    pub async fn close(self) -> Result<()> {
        self.conn
            .close()
            .await
            .map_err(|e| OrgStoreError::Database(format!("Failed to close database: {}", e)))
    }

    /// Get the inner SeaORM connection
    pub fn as_ref(&self) -> &SeaOrmConnection {
        &self.conn
    }

    /// Consume the wrapper, returning the inner SeaORM connection
    pub fn into_inner(self) -> SeaOrmConnection {
        self.conn
    }
}

impl std::ops::Deref for DatabaseConnection {
    type Target = SeaOrmConnection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}
