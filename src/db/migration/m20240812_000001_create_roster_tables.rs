//! Initial schema: `clans` and `members` with the full current column set.
//!
//! `CREATE TABLE IF NOT EXISTS` leaves tables created by older releases
//! untouched; the later steps patch those up to the current shape.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

use super::{Clans, Members};

const CREATE_CLANS: &str = "\
CREATE TABLE IF NOT EXISTS clans (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL,
  created_at TEXT NOT NULL
)";

const CREATE_MEMBERS: &str = "\
CREATE TABLE IF NOT EXISTS members (
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
)";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        conn.execute_unprepared(CREATE_CLANS).await?;
        conn.execute_unprepared(CREATE_MEMBERS).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Members first: it carries the foreign key.
        manager
            .drop_table(Table::drop().table(Members::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clans::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
