//! Store schema migrations

use crate::error::RosterError;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

use super::migration::Migrator;

/// Apply all pending migrations to bring the store up to the current schema.
/// Safe to run on every startup; a store already at the current schema sees
/// zero structural changes. Any failure is fatal to the calling startup flow
/// and leaves the store at its prior version, so the caller may retry the
/// whole initialization.
pub async fn apply_migrations_async(conn: &DatabaseConnection) -> Result<(), RosterError> {
    Migrator::up(conn, None)
        .await
        .map_err(|e| RosterError::migration_failed(format!("Migration failed: {}", e)))?;
    tracing::info!("store schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::open_memory_connection_async;
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    async fn column_names(conn: &DatabaseConnection, table: &str) -> Vec<String> {
        let rows = conn
            .query_all(Statement::from_sql_and_values(
                DatabaseBackend::Sqlite,
                "SELECT name FROM pragma_table_info(?)",
                [table.into()],
            ))
            .await
            .unwrap();
        rows.iter()
            .map(|r| r.try_get_by_index::<String>(0).unwrap())
            .collect()
    }

    async fn count_members(conn: &DatabaseConnection) -> i64 {
        conn.query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) FROM members".to_string(),
        ))
        .await
        .unwrap()
        .unwrap()
        .try_get_by_index(0)
        .unwrap()
    }

    /// Build a store the way the class-era release did: no migration
    /// tracking, `class` instead of `className`, no photo or attribute
    /// columns.
    async fn seed_legacy_store(conn: &DatabaseConnection) {
        conn.execute_unprepared(
            "CREATE TABLE clans (
               id INTEGER PRIMARY KEY AUTOINCREMENT,
               name TEXT NOT NULL,
               created_at TEXT NOT NULL
             );
             CREATE TABLE members (
               id INTEGER PRIMARY KEY AUTOINCREMENT,
               clan_id INTEGER NOT NULL,
               name TEXT NOT NULL,
               class TEXT,
               role TEXT,
               status TEXT,
               created_at TEXT NOT NULL,
               FOREIGN KEY(clan_id) REFERENCES clans(id) ON DELETE CASCADE
             );
             INSERT INTO clans (name, created_at) VALUES ('Alpha', '2023-11-02T10:00:00.000Z');
             INSERT INTO members (clan_id, name, class, role, status, created_at)
               VALUES (1, 'Jorge', 'guerrero', 'Líder', 'leader', '2023-11-02T10:05:00.000Z');
             INSERT INTO members (clan_id, name, class, role, status, created_at)
               VALUES (1, 'Ana', 'maga', '', 'member', '2023-11-03T09:00:00.000Z');",
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_fresh_store_gets_current_schema() {
        let conn = open_memory_connection_async().await.unwrap();
        apply_migrations_async(&conn).await.unwrap();

        let cols = column_names(&conn, "members").await;
        for expected in [
            "id", "clan_id", "name", "className", "role", "status", "photoUri", "str", "def",
            "agi", "mag", "luck", "created_at",
        ] {
            assert!(cols.iter().any(|c| c == expected), "missing column {expected}");
        }
        assert!(!cols.iter().any(|c| c == "class"));
    }

    #[tokio::test]
    async fn test_apply_migrations_idempotent() {
        let conn = open_memory_connection_async().await.unwrap();
        apply_migrations_async(&conn).await.unwrap();
        let cols_first = column_names(&conn, "members").await;

        apply_migrations_async(&conn).await.unwrap();
        let cols_second = column_names(&conn, "members").await;

        assert_eq!(cols_first, cols_second);
    }

    #[tokio::test]
    async fn test_legacy_store_converges_without_data_loss() {
        let conn = open_memory_connection_async().await.unwrap();
        seed_legacy_store(&conn).await;
        assert_eq!(count_members(&conn).await, 2);

        apply_migrations_async(&conn).await.unwrap();

        let cols = column_names(&conn, "members").await;
        assert!(cols.iter().any(|c| c == "className"));
        assert!(!cols.iter().any(|c| c == "class"));
        assert!(cols.iter().any(|c| c == "photoUri"));
        for stat in ["str", "def", "agi", "mag", "luck"] {
            assert!(cols.iter().any(|c| c == stat), "missing column {stat}");
        }

        // Row count unchanged, class values carried into className,
        // photo and attributes NULL.
        assert_eq!(count_members(&conn).await, 2);
        let row = conn
            .query_one(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT className, photoUri, str FROM members WHERE name = 'Jorge'".to_string(),
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            row.try_get_by_index::<Option<String>>(0).unwrap(),
            Some("guerrero".to_string())
        );
        assert_eq!(row.try_get_by_index::<Option<String>>(1).unwrap(), None);
        assert_eq!(row.try_get_by_index::<Option<i32>>(2).unwrap(), None);
    }

    #[tokio::test]
    async fn test_legacy_store_migration_is_idempotent() {
        let conn = open_memory_connection_async().await.unwrap();
        seed_legacy_store(&conn).await;

        apply_migrations_async(&conn).await.unwrap();
        apply_migrations_async(&conn).await.unwrap();

        assert_eq!(count_members(&conn).await, 2);
        let cols = column_names(&conn, "members").await;
        assert_eq!(cols.iter().filter(|c| *c == "className").count(), 1);
    }
}
