//! Versioned, forward-only schema migrations.
//!
//! Each step carries an introspection precondition (target column absent or
//! present) in addition to sea-orm-migration's tracking table, so stores
//! created by releases that predate migration tracking still converge to the
//! current schema without data loss. Ordering is significant: the
//! `class` -> `className` rename must run before the additive steps that
//! assume the renamed column exists.

use sea_orm_migration::prelude::*;

mod m20240812_000001_create_roster_tables;
mod m20240901_000002_rename_class_column;
mod m20240915_000003_add_photo_uri;
mod m20241002_000004_add_attribute_columns;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240812_000001_create_roster_tables::Migration),
            Box::new(m20240901_000002_rename_class_column::Migration),
            Box::new(m20240915_000003_add_photo_uri::Migration),
            Box::new(m20241002_000004_add_attribute_columns::Migration),
        ]
    }
}

#[derive(DeriveIden)]
pub(crate) enum Clans {
    Table,
}

#[derive(DeriveIden)]
pub(crate) enum Members {
    Table,
    #[sea_orm(iden = "photoUri")]
    PhotoUri,
    Str,
    Def,
    Agi,
    Mag,
    Luck,
}
