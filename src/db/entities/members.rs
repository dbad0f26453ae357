use sea_orm::entity::prelude::*;

/// Column names `className` and `photoUri` are camel-cased in the store for
/// compatibility with databases created by earlier releases.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub clan_id: i64,
    pub name: String,
    #[sea_orm(column_name = "className")]
    pub class_name: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    #[sea_orm(column_name = "photoUri")]
    pub photo_uri: Option<String>,
    pub str: Option<i32>,
    pub def: Option<i32>,
    pub agi: Option<i32>,
    pub mag: Option<i32>,
    pub luck: Option<i32>,
    /// ISO-8601 timestamp, immutable after creation
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Clan,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Clan => Entity::belongs_to(super::clans::Entity)
                .from(Column::ClanId)
                .to(super::clans::Column::Id)
                .into(),
        }
    }
}

impl Related<super::clans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
