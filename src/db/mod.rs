//! On-device roster store.
//!
//! SeaORM over SQLite: [`connection`] owns the connection lifecycle, the
//! migration modules the forward-only schema steps, and [`RosterQueries`]
//! the typed CRUD operations. [`RosterDb`] ties them together as the one handle the
//! embedding shell constructs at startup and passes by reference wherever
//! store access is needed.

pub mod connection;
mod entities;
mod migration;
mod migrations;
mod queries;

pub use connection::{default_database_path, delete_database};
pub use migrations::apply_migrations_async;
pub use queries::RosterQueries;

use std::path::Path;

use sea_orm::DatabaseConnection;

use crate::error::RosterError;

/// The process-wide roster store handle.
///
/// Opening is idempotent with respect to the persisted schema: regardless of
/// which historical release created the store file, a single `open` leaves
/// it at the current schema without data loss. A failed open may be retried
/// from scratch.
#[derive(Debug)]
pub struct RosterDb {
    conn: DatabaseConnection,
}

impl RosterDb {
    /// Open (or create) the store at `db_path` and bring its schema up to
    /// date.
    pub async fn open(db_path: &Path) -> Result<Self, RosterError> {
        let conn = connection::open_connection_async(db_path).await?;
        migrations::apply_migrations_async(&conn).await?;
        Ok(Self { conn })
    }

    /// Open the store at its default on-device location
    pub async fn open_default() -> Result<Self, RosterError> {
        Self::open(&connection::default_database_path()).await
    }

    /// In-memory store for tests; schema is created the same way
    pub async fn open_in_memory() -> Result<Self, RosterError> {
        let conn = connection::open_memory_connection_async().await?;
        migrations::apply_migrations_async(&conn).await?;
        Ok(Self { conn })
    }

    /// The shared connection consumed by [`RosterQueries`]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reopening an on-disk store must be a no-op structurally and must not
    /// lose rows.
    #[tokio::test]
    async fn test_reopen_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("clanes.db");

        let clan_id = {
            let db = RosterDb::open(&db_path).await.unwrap();
            RosterQueries::add_clan(db.connection(), "Alpha").await.unwrap()
        };

        let db = RosterDb::open(&db_path).await.unwrap();
        let clan = RosterQueries::get_clan(db.connection(), clan_id)
            .await
            .unwrap()
            .expect("clan should survive reopen");
        assert_eq!(clan.name, "Alpha");
    }
}
