//! Idempotent, dialect-aware schema provisioning.
//!
//! The logical schema is declared once by the entities in [`crate::entity`];
//! sea-query renders it per dialect, so auto-increment becomes
//! `AUTOINCREMENT`, `AUTO_INCREMENT` or `SERIAL` depending on the backend.
//! Safe to run on every startup: tables are created with `IF NOT EXISTS`,
//! and index creation is guarded per the dialect's capabilities.

use sea_orm::sea_query::{Index, IndexCreateStatement, TableCreateStatement};
use sea_orm::{ConnectionTrait, DatabaseBackend, Schema, Statement};

use crate::entity::{org_group, org_user, organization};
use crate::error::{OrgStoreError, Result};

/// Ensure the three tables and their secondary indexes exist.
///
/// Any DDL failure aborts provisioning and is reported to the caller;
/// provisioning is not retried automatically.
pub async fn ensure_schema<C>(conn: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let backend = conn.get_database_backend();

    for stmt in table_statements(backend) {
        conn.execute(backend.build(&stmt))
            .await
            .map_err(|e| OrgStoreError::Database(format!("Failed to create table: {}", e)))?;
    }

    // MySQL's indexes ride inside the guarded CREATE TABLE; the other two
    // dialects create them separately.
    if backend != DatabaseBackend::MySql {
        for (name, stmt) in secondary_indexes() {
            create_index(conn, backend, name, stmt).await?;
        }
    }

    tracing::info!(backend = ?backend, "organization schema provisioned");
    Ok(())
}

/// The table DDL for a backend, rendered from the entity definitions.
fn table_statements(backend: DatabaseBackend) -> Vec<TableCreateStatement> {
    let schema = Schema::new(backend);
    let mut tables = vec![
        schema.create_table_from_entity(organization::Entity),
        schema.create_table_from_entity(org_user::Entity),
        schema.create_table_from_entity(org_group::Entity),
    ];

    for table in &mut tables {
        table.if_not_exists();
    }

    if backend == DatabaseBackend::MySql {
        // MySQL cannot guard a bare CREATE INDEX with IF NOT EXISTS, so the
        // secondary indexes are declared inline, covered by the table guard.
        tables[1].index(
            Index::create()
                .name("idx_org_users_email")
                .col(org_user::Column::Email),
        );
        tables[2].index(
            Index::create()
                .name("idx_org_groups_group_id")
                .col(org_group::Column::GroupId),
        );

        for table in &mut tables {
            table.engine("InnoDB");
        }
    }

    tables
}

/// Secondary indexes on the association tables.
///
/// Pair uniqueness is already enforced by the composite primary keys, and
/// `url_prefix` by its table-level UNIQUE constraint, so only the two
/// lookup indexes are created here.
fn secondary_indexes() -> Vec<(&'static str, IndexCreateStatement)> {
    vec![
        (
            "idx_org_users_email",
            Index::create()
                .name("idx_org_users_email")
                .table(org_user::Entity)
                .col(org_user::Column::Email)
                .to_owned(),
        ),
        (
            "idx_org_groups_group_id",
            Index::create()
                .name("idx_org_groups_group_id")
                .table(org_group::Entity)
                .col(org_group::Column::GroupId)
                .to_owned(),
        ),
    ]
}

async fn create_index<C>(
    conn: &C,
    backend: DatabaseBackend,
    name: &str,
    mut stmt: IndexCreateStatement,
) -> Result<()>
where
    C: ConnectionTrait,
{
    if backend == DatabaseBackend::Postgres {
        // Postgres versions predating CREATE INDEX IF NOT EXISTS are in the
        // support matrix, so probe the catalog by name instead.
        if postgres_index_exists(conn, name).await? {
            tracing::debug!(index = name, "index already present");
            return Ok(());
        }
    } else {
        stmt.if_not_exists();
    }

    conn.execute(backend.build(&stmt))
        .await
        .map_err(|e| OrgStoreError::Database(format!("Failed to create index {}: {}", name, e)))?;
    Ok(())
}

async fn postgres_index_exists<C>(conn: &C, name: &str) -> Result<bool>
where
    C: ConnectionTrait,
{
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        "SELECT 1 FROM pg_class WHERE relname = $1 AND relkind = 'i'",
        [name.into()],
    );

    let row = conn
        .query_one(stmt)
        .await
        .map_err(|e| OrgStoreError::Database(format!("Failed to check index {}: {}", name, e)))?;

    Ok(row.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(backend: DatabaseBackend) -> Vec<String> {
        table_statements(backend)
            .iter()
            .map(|stmt| backend.build(stmt).to_string())
            .collect()
    }

    #[test]
    fn test_sqlite_dialect() {
        let tables = rendered(DatabaseBackend::Sqlite);
        assert!(tables[0].contains("AUTOINCREMENT"));
        assert!(tables[0].contains("IF NOT EXISTS"));
        // url_prefix carries the table-level uniqueness constraint
        assert!(tables[0].to_lowercase().contains("unique"));
        assert!(!tables[0].contains("InnoDB"));
    }

    #[test]
    fn test_mysql_dialect() {
        let tables = rendered(DatabaseBackend::MySql);
        assert!(tables[0].contains("AUTO_INCREMENT"));
        assert!(tables[0].contains("InnoDB"));
        assert!(tables[1].contains("InnoDB"));
        assert!(tables[2].contains("InnoDB"));
        // Secondary indexes are declared inline, inside the table guard
        assert!(tables[1].contains("idx_org_users_email"));
        assert!(tables[2].contains("idx_org_groups_group_id"));
    }

    #[test]
    fn test_postgres_dialect() {
        let tables = rendered(DatabaseBackend::Postgres);
        assert!(tables[0].to_lowercase().contains("serial"));
        assert!(!tables[0].contains("InnoDB"));
        // No inline indexes: Postgres creates them after a catalog probe
        assert!(!tables[1].contains("idx_org_users_email"));
    }

    #[test]
    fn test_association_tables_have_composite_keys() {
        for backend in [
            DatabaseBackend::Sqlite,
            DatabaseBackend::MySql,
            DatabaseBackend::Postgres,
        ] {
            let tables = rendered(backend);
            // org_users and org_groups each declare a two-column primary key
            assert!(tables[1].contains("PRIMARY KEY"));
            assert!(tables[2].contains("PRIMARY KEY"));
        }
    }

    #[test]
    fn test_index_guards_per_dialect() {
        for (name, stmt) in secondary_indexes() {
            // SQLite relies on the inline guard
            let mut guarded = stmt.clone();
            guarded.if_not_exists();
            let sql = DatabaseBackend::Sqlite.build(&guarded).to_string();
            assert!(sql.contains("IF NOT EXISTS"), "{}: {}", name, sql);

            // Postgres statements are issued bare, after the catalog probe
            let sql = DatabaseBackend::Postgres.build(&stmt).to_string();
            assert!(!sql.contains("IF NOT EXISTS"), "{}: {}", name, sql);
            assert!(sql.contains(name));
        }
    }
}
