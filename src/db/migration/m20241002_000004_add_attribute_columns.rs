//! Add the five attribute columns (`str`, `def`, `agi`, `mag`, `luck`),
//! each independently if absent. SQLite only allows one ADD COLUMN per
//! ALTER TABLE, so each column gets its own statement.

use sea_orm_migration::prelude::*;

use super::Members;

#[derive(DeriveMigrationName)]
pub struct Migration;

const ATTRIBUTE_COLUMNS: [Members; 5] = [
    Members::Str,
    Members::Def,
    Members::Agi,
    Members::Mag,
    Members::Luck,
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in ATTRIBUTE_COLUMNS {
            if manager.has_column("members", column.to_string()).await? {
                continue;
            }
            manager
                .alter_table(
                    Table::alter()
                        .table(Members::Table)
                        .add_column(ColumnDef::new(column).integer())
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in ATTRIBUTE_COLUMNS {
            manager
                .alter_table(
                    Table::alter()
                        .table(Members::Table)
                        .drop_column(column)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }
}
