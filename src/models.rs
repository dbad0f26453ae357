//! Domain types exposed to the embedding shell.
//!
//! Storage keeps `role` and `status` as open text for forward compatibility
//! with labels that have historically changed; the API boundary wraps
//! `status` in [`MemberStatus`] with an explicit [`MemberStatus::Other`]
//! variant so new labels survive a round trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The one role value with special semantics: at most one member per clan
/// may hold it at any time. Enforced by the store's leader transition, not
/// by a database constraint.
pub const LEADER_ROLE: &str = "Líder";

/// A clan as stored on device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clan {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Membership status label.
///
/// The four known labels are stored as plain text; anything else read back
/// from the store (or typed in by a moderator) is preserved verbatim in
/// `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MemberStatus {
    NewMember,
    Member,
    Elder,
    Leader,
    Other(String),
}

impl MemberStatus {
    /// The label as persisted in the store.
    pub fn as_label(&self) -> &str {
        match self {
            MemberStatus::NewMember => "new member",
            MemberStatus::Member => "member",
            MemberStatus::Elder => "elder",
            MemberStatus::Leader => "leader",
            MemberStatus::Other(label) => label,
        }
    }

    /// Parse a stored label. Unrecognized labels are kept as `Other`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "new member" => MemberStatus::NewMember,
            "member" => MemberStatus::Member,
            "elder" => MemberStatus::Elder,
            "leader" => MemberStatus::Leader,
            other => MemberStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for MemberStatus {
    fn from(label: String) -> Self {
        MemberStatus::from_label(&label)
    }
}

impl From<MemberStatus> for String {
    fn from(status: MemberStatus) -> Self {
        status.as_label().to_string()
    }
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Optional strength/defense/agility/magic/luck profile on a 0-100 scale,
/// consumed by the attribute-radar visualization in the shell. Unset fields
/// stay absent (NULL in the store), never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatProfile {
    pub str: Option<i32>,
    pub def: Option<i32>,
    pub agi: Option<i32>,
    pub mag: Option<i32>,
    pub luck: Option<i32>,
}

impl StatProfile {
    /// True when no attribute has been set.
    pub fn is_empty(&self) -> bool {
        self.str.is_none()
            && self.def.is_none()
            && self.agi.is_none()
            && self.mag.is_none()
            && self.luck.is_none()
    }
}

/// A clan member as stored on device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i64,
    pub clan_id: i64,
    pub name: String,
    /// Free-text character-class label (e.g. "guerrero", "maga"); the shell
    /// uses it to pick a default stat profile and avatar when explicit stats
    /// are absent.
    pub class_name: Option<String>,
    pub role: Option<String>,
    pub status: Option<MemberStatus>,
    pub photo_uri: Option<String>,
    pub stats: StatProfile,
    pub created_at: DateTime<Utc>,
}

impl Member {
    /// True iff this member currently holds the clan leader role.
    pub fn is_leader(&self) -> bool {
        self.role.as_deref() == Some(LEADER_ROLE)
    }
}

/// Input for creating a member. `created_at` and the id are assigned by the
/// store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    pub clan_id: i64,
    pub name: String,
    pub class_name: Option<String>,
    pub role: Option<String>,
    pub status: Option<MemberStatus>,
    pub photo_uri: Option<String>,
    #[serde(default)]
    pub stats: StatProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_known_labels_round_trip() {
        for (status, label) in [
            (MemberStatus::NewMember, "new member"),
            (MemberStatus::Member, "member"),
            (MemberStatus::Elder, "elder"),
            (MemberStatus::Leader, "leader"),
        ] {
            assert_eq!(status.as_label(), label);
            assert_eq!(MemberStatus::from_label(label), status);
        }
    }

    #[test]
    fn test_status_unknown_label_preserved() {
        let status = MemberStatus::from_label("veterano");
        assert_eq!(status, MemberStatus::Other("veterano".to_string()));
        assert_eq!(status.as_label(), "veterano");
    }

    #[test]
    fn test_status_serde_as_plain_string() {
        let json = serde_json::to_string(&MemberStatus::Elder).unwrap();
        assert_eq!(json, "\"elder\"");

        let parsed: MemberStatus = serde_json::from_str("\"veterano\"").unwrap();
        assert_eq!(parsed, MemberStatus::Other("veterano".to_string()));
    }

    #[test]
    fn test_stat_profile_default_is_empty() {
        let stats = StatProfile::default();
        assert!(stats.is_empty());

        let stats = StatProfile {
            mag: Some(80),
            ..StatProfile::default()
        };
        assert!(!stats.is_empty());
    }

    #[test]
    fn test_is_leader() {
        let member = Member {
            id: 1,
            clan_id: 1,
            name: "Jorge".to_string(),
            class_name: None,
            role: Some(LEADER_ROLE.to_string()),
            status: Some(MemberStatus::NewMember),
            photo_uri: None,
            stats: StatProfile::default(),
            created_at: Utc::now(),
        };
        assert!(member.is_leader());

        let member = Member {
            role: None,
            ..member
        };
        assert!(!member.is_leader());
    }
}
