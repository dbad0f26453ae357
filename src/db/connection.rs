//! Store connection management with WAL mode configuration

use crate::error::RosterError;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default on-device location of the roster store
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clan-roster")
        .join("clanes.db")
}

/// Delete the store file to allow a fresh rebuild.
/// Returns true if the file was deleted, false if it didn't exist.
pub fn delete_database(db_path: &Path) -> Result<bool, RosterError> {
    if db_path.exists() {
        // Also delete WAL and SHM sidecars if they exist
        let wal_path = db_path.with_extension("db-wal");
        let shm_path = db_path.with_extension("db-shm");

        std::fs::remove_file(db_path)
            .map_err(|e| RosterError::database(format!("Failed to delete store: {}", e)))?;

        // WAL/SHM files may not exist
        let _ = std::fs::remove_file(&wal_path);
        let _ = std::fs::remove_file(&shm_path);

        Ok(true)
    } else {
        Ok(false)
    }
}

fn sqlite_url(db_path: &Path) -> String {
    let normalized = db_path.to_string_lossy().replace('\\', "/");
    format!("sqlite://{}?mode=rwc", normalized)
}

async fn execute_pragma(db: &DatabaseConnection, sql: &str) -> Result<(), RosterError> {
    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        sql.to_string(),
    ))
    .await
    .map_err(RosterError::from)?;
    Ok(())
}

/// Configure store pragmas:
/// - WAL mode: survive the shell being killed mid-write
/// - Foreign keys: clan deletion cascades to members
/// - Busy timeout: wait up to 5 seconds for locks
/// - Synchronous NORMAL: good balance of safety and speed
async fn configure_pragmas(db: &DatabaseConnection) -> Result<(), RosterError> {
    execute_pragma(db, "PRAGMA journal_mode=WAL;").await?;
    execute_pragma(db, "PRAGMA foreign_keys=ON;").await?;
    execute_pragma(db, "PRAGMA busy_timeout=5000;").await?;
    execute_pragma(db, "PRAGMA synchronous=NORMAL;").await?;
    Ok(())
}

/// Open the store at the given path, creating it (and its parent directory)
/// on first run.
pub async fn open_connection_async(db_path: &Path) -> Result<DatabaseConnection, RosterError> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| RosterError::database(format!("Failed to create store directory: {}", e)))?;
    }

    // One connection: pragmas are per-connection state, and the referential
    // cascade requires foreign_keys=ON on whichever connection executes the
    // delete. The store serializes operations over this handle.
    let mut options = ConnectOptions::new(sqlite_url(db_path));
    options
        .max_connections(1)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .map_err(|e| RosterError::database(format!("Failed to open store: {}", e)))?;

    configure_pragmas(&db).await?;

    tracing::debug!(path = %db_path.display(), "roster store opened");
    Ok(db)
}

/// Open an in-memory store for testing
pub async fn open_memory_connection_async() -> Result<DatabaseConnection, RosterError> {
    // Also one connection: every pooled connection to `sqlite::memory:`
    // would otherwise see its own empty database.
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .map_err(|e| RosterError::database(format!("Failed to open in-memory store: {}", e)))?;
    execute_pragma(&db, "PRAGMA foreign_keys=ON;").await?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_path() {
        let path = default_database_path();
        assert!(path.to_string_lossy().contains("clanes.db"));
    }

    #[tokio::test]
    async fn test_open_memory_connection_enables_foreign_keys() {
        let conn = open_memory_connection_async()
            .await
            .expect("Failed to open in-memory connection");
        let row = conn
            .query_one(Statement::from_string(
                DatabaseBackend::Sqlite,
                "PRAGMA foreign_keys".to_string(),
            ))
            .await
            .expect("Failed to query PRAGMA");
        let fk_enabled: i32 = row.unwrap().try_get_by_index(0).unwrap_or(0);
        assert_eq!(fk_enabled, 1);
    }

    #[tokio::test]
    async fn test_open_creates_parent_directory_and_delete_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("clanes.db");

        let conn = open_connection_async(&db_path).await.unwrap();
        // Force the file into existence before deleting
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "CREATE TABLE t (id INTEGER PRIMARY KEY)".to_string(),
        ))
        .await
        .unwrap();
        drop(conn);

        assert!(db_path.exists());
        assert!(delete_database(&db_path).unwrap());
        assert!(!db_path.exists());
        assert!(!delete_database(&db_path).unwrap());
    }
}
