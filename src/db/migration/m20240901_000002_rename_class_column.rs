//! Rename the legacy `class` column to `className`.
//!
//! SQLite cannot rename a column in place on the versions this store has to
//! support, so the step rebuilds the table: create a replacement with the
//! current column set, copy every row across with the rename applied, drop
//! the old table, and install the replacement under the original name. The
//! whole rebuild runs in one transaction.
//!
//! Precondition: `className` absent and `class` present. Databases where the
//! rename already happened (or that were created fresh at the current
//! schema) are left untouched.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, TransactionTrait};

const REBUILD_MEMBERS: &[&str] = &[
    "CREATE TABLE members_tmp (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      clan_id INTEGER NOT NULL,
      name TEXT NOT NULL,
      className TEXT,
      role TEXT,
      status TEXT,
      photoUri TEXT,
      str INTEGER,
      def INTEGER,
      agi INTEGER,
      mag INTEGER,
      luck INTEGER,
      created_at TEXT NOT NULL,
      FOREIGN KEY(clan_id) REFERENCES clans(id) ON DELETE CASCADE
    )",
    // The class-era schema predates photoUri and the attribute columns, so
    // those start out NULL for every copied row.
    "INSERT INTO members_tmp (id, clan_id, name, className, role, status, photoUri, str, def, agi, mag, luck, created_at)
     SELECT id, clan_id, name, class AS className, role, status, NULL, NULL, NULL, NULL, NULL, NULL, created_at
     FROM members",
    "DROP TABLE members",
    "ALTER TABLE members_tmp RENAME TO members",
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let has_new = manager.has_column("members", "className").await?;
        let has_old = manager.has_column("members", "class").await?;
        if has_new || !has_old {
            return Ok(());
        }

        tracing::info!("renaming members.class to members.className (table rebuild)");

        let txn = manager.get_connection().begin().await?;
        for sql in REBUILD_MEMBERS {
            txn.execute_unprepared(sql).await?;
        }
        txn.commit().await?;
        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        Err(DbErr::Migration(
            "rename_class_column is forward-only".to_string(),
        ))
    }
}
