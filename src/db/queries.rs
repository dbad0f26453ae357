//! Store query operations for clans and members

use crate::error::RosterError;
use crate::models::{Clan, Member, MemberStatus, NewMember, StatProfile, LEADER_ROLE};
use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use super::entities::{clans, members};

/// Current time as the ISO-8601 string persisted in `created_at`
fn iso_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored `created_at` value.
/// Unparseable timestamps fall back to the epoch rather than failing a read.
fn parse_created_at(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Treat NULL and whitespace-only text as absent
fn normalize_optional(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn clan_from_model(model: clans::Model) -> Clan {
    Clan {
        id: model.id,
        name: model.name,
        created_at: parse_created_at(&model.created_at),
    }
}

fn member_from_model(model: members::Model) -> Member {
    Member {
        id: model.id,
        clan_id: model.clan_id,
        name: model.name,
        class_name: normalize_optional(model.class_name),
        role: normalize_optional(model.role),
        status: normalize_optional(model.status).map(|s| MemberStatus::from_label(&s)),
        photo_uri: model.photo_uri,
        stats: StatProfile {
            str: model.str,
            def: model.def,
            agi: model.agi,
            mag: model.mag,
            luck: model.luck,
        },
        created_at: parse_created_at(&model.created_at),
    }
}

/// Roster store query operations.
///
/// All operations take the shared connection owned by
/// [`RosterDb`](super::RosterDb); the underlying store serializes them.
pub struct RosterQueries;

impl RosterQueries {
    /// Insert a new clan and return its id.
    /// The name is trimmed before storage; an empty name is rejected.
    pub async fn add_clan(conn: &DatabaseConnection, name: &str) -> Result<i64, RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::validation("Clan name must not be empty"));
        }

        let active = clans::ActiveModel {
            id: ActiveValue::NotSet,
            name: Set(name.to_string()),
            created_at: Set(iso_now()),
        };

        let result = clans::Entity::insert(active)
            .exec(conn)
            .await
            .map_err(RosterError::from)?;

        Ok(result.last_insert_id)
    }

    /// All clans, newest first
    pub async fn list_clans(conn: &DatabaseConnection) -> Result<Vec<Clan>, RosterError> {
        let rows = clans::Entity::find()
            .order_by_desc(clans::Column::CreatedAt)
            .order_by_desc(clans::Column::Id)
            .all(conn)
            .await
            .map_err(RosterError::from)?;

        Ok(rows.into_iter().map(clan_from_model).collect())
    }

    pub async fn get_clan(
        conn: &DatabaseConnection,
        clan_id: i64,
    ) -> Result<Option<Clan>, RosterError> {
        let row = clans::Entity::find_by_id(clan_id)
            .one(conn)
            .await
            .map_err(RosterError::from)?;
        Ok(row.map(clan_from_model))
    }

    /// Remove a clan; the referential cascade removes its members.
    /// No-op if the id does not exist.
    pub async fn delete_clan(conn: &DatabaseConnection, clan_id: i64) -> Result<(), RosterError> {
        let result = clans::Entity::delete_by_id(clan_id)
            .exec(conn)
            .await
            .map_err(RosterError::from)?;
        if result.rows_affected > 0 {
            tracing::debug!(clan_id, "clan deleted");
        }
        Ok(())
    }

    /// Insert a new member and return its id.
    ///
    /// The name is trimmed before storage; an empty name or a `clan_id` that
    /// references no existing clan is rejected with a validation error (the
    /// existence check runs in the same transaction as the insert, so the
    /// member can never land in a clan deleted mid-call).
    pub async fn add_member(
        conn: &DatabaseConnection,
        new_member: NewMember,
    ) -> Result<i64, RosterError> {
        let name = new_member.name.trim();
        if name.is_empty() {
            return Err(RosterError::validation("Member name must not be empty"));
        }

        let txn = conn.begin().await.map_err(RosterError::from)?;

        let clan_exists = clans::Entity::find_by_id(new_member.clan_id)
            .one(&txn)
            .await
            .map_err(RosterError::from)?
            .is_some();
        if !clan_exists {
            return Err(RosterError::with_details(
                crate::error::RosterErrorCode::ValidationFailed,
                "Member must belong to an existing clan",
                format!("clan_id={}", new_member.clan_id),
            ));
        }

        let active = members::ActiveModel {
            id: ActiveValue::NotSet,
            clan_id: Set(new_member.clan_id),
            name: Set(name.to_string()),
            class_name: Set(normalize_optional(new_member.class_name)),
            role: Set(normalize_optional(new_member.role)),
            status: Set(new_member.status.map(|s| s.as_label().to_string())),
            photo_uri: Set(new_member.photo_uri),
            str: Set(new_member.stats.str),
            def: Set(new_member.stats.def),
            agi: Set(new_member.stats.agi),
            mag: Set(new_member.stats.mag),
            luck: Set(new_member.stats.luck),
            created_at: Set(iso_now()),
        };

        let result = members::Entity::insert(active)
            .exec(&txn)
            .await
            .map_err(RosterError::from)?;

        txn.commit().await.map_err(RosterError::from)?;
        Ok(result.last_insert_id)
    }

    /// Members of one clan, newest first
    pub async fn list_members_by_clan(
        conn: &DatabaseConnection,
        clan_id: i64,
    ) -> Result<Vec<Member>, RosterError> {
        let rows = members::Entity::find()
            .filter(members::Column::ClanId.eq(clan_id))
            .order_by_desc(members::Column::CreatedAt)
            .order_by_desc(members::Column::Id)
            .all(conn)
            .await
            .map_err(RosterError::from)?;

        Ok(rows.into_iter().map(member_from_model).collect())
    }

    pub async fn get_member(
        conn: &DatabaseConnection,
        member_id: i64,
    ) -> Result<Option<Member>, RosterError> {
        let row = members::Entity::find_by_id(member_id)
            .one(conn)
            .await
            .map_err(RosterError::from)?;
        Ok(row.map(member_from_model))
    }

    /// Remove a member; no-op if absent
    pub async fn delete_member(
        conn: &DatabaseConnection,
        member_id: i64,
    ) -> Result<(), RosterError> {
        members::Entity::delete_by_id(member_id)
            .exec(conn)
            .await
            .map_err(RosterError::from)?;
        Ok(())
    }

    /// Promote `member_id` to clan leader, demoting whoever currently holds
    /// the role in that clan.
    ///
    /// Demote and promote run in one transaction, so a concurrent reader
    /// never observes a clan with zero or two leaders mid-operation. The
    /// member must belong to `clan_id`; a mismatched pair is rejected with
    /// a validation error rather than silently crowning an outsider.
    pub async fn set_leader(
        conn: &DatabaseConnection,
        clan_id: i64,
        member_id: i64,
    ) -> Result<(), RosterError> {
        let txn = conn.begin().await.map_err(RosterError::from)?;

        let member = members::Entity::find_by_id(member_id)
            .one(&txn)
            .await
            .map_err(RosterError::from)?;
        match member {
            None => {
                return Err(RosterError::with_details(
                    crate::error::RosterErrorCode::ValidationFailed,
                    "Cannot promote a member that does not exist",
                    format!("member_id={}", member_id),
                ));
            }
            Some(ref m) if m.clan_id != clan_id => {
                return Err(RosterError::with_details(
                    crate::error::RosterErrorCode::ValidationFailed,
                    "Member does not belong to the given clan",
                    format!("member_id={} clan_id={}", member_id, clan_id),
                ));
            }
            Some(_) => {}
        }

        members::Entity::update_many()
            .col_expr(members::Column::Role, Expr::value(Option::<String>::None))
            .filter(members::Column::ClanId.eq(clan_id))
            .filter(members::Column::Role.eq(LEADER_ROLE))
            .exec(&txn)
            .await
            .map_err(RosterError::from)?;

        members::Entity::update_many()
            .col_expr(members::Column::Role, Expr::value(LEADER_ROLE))
            .filter(members::Column::Id.eq(member_id))
            .exec(&txn)
            .await
            .map_err(RosterError::from)?;

        txn.commit().await.map_err(RosterError::from)?;
        tracing::debug!(clan_id, member_id, "leader changed");
        Ok(())
    }

    /// Direct status update; no-op if the member is absent
    pub async fn update_member_status(
        conn: &DatabaseConnection,
        member_id: i64,
        new_status: MemberStatus,
    ) -> Result<(), RosterError> {
        members::Entity::update_many()
            .col_expr(
                members::Column::Status,
                Expr::value(new_status.as_label().to_string()),
            )
            .filter(members::Column::Id.eq(member_id))
            .exec(conn)
            .await
            .map_err(RosterError::from)?;
        Ok(())
    }

    /// Direct role update. Does not enforce leader uniqueness; callers
    /// setting [`LEADER_ROLE`] directly are responsible for it (or should
    /// use [`Self::set_leader`]).
    pub async fn update_member_role(
        conn: &DatabaseConnection,
        member_id: i64,
        new_role: Option<&str>,
    ) -> Result<(), RosterError> {
        let value = new_role
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);
        members::Entity::update_many()
            .col_expr(members::Column::Role, Expr::value(value))
            .filter(members::Column::Id.eq(member_id))
            .exec(conn)
            .await
            .map_err(RosterError::from)?;
        Ok(())
    }

    /// True iff some member of the clan currently holds the leader role
    pub async fn clan_has_leader(
        conn: &DatabaseConnection,
        clan_id: i64,
    ) -> Result<bool, RosterError> {
        let count = members::Entity::find()
            .filter(members::Column::ClanId.eq(clan_id))
            .filter(members::Column::Role.eq(LEADER_ROLE))
            .count(conn)
            .await
            .map_err(RosterError::from)?;
        Ok(count > 0)
    }
}
