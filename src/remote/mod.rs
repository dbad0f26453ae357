//! Client for the remote spreadsheet-backed roster service.
//!
//! The service is an opaque request/response bridge: every call is a JSON
//! POST carrying an `action` name plus parameters, authenticated with a
//! moderator key header, and list responses arrive either as a bare array
//! or as an object with an `items` array depending on the endpoint.
//!
//! This is an alternate data source the embedding shell may select instead
//! of the on-device store; nothing under [`crate::db`] depends on it.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{RosterError, RosterResult};

/// Header carrying the moderator key that gates mutating actions
const MOD_KEY_HEADER: &str = "x-mod-key";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the remote roster service
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the bridge backend, e.g. `https://example.vercel.app`
    pub base_url: String,
    /// Moderator key; sent with every request when present
    pub moderator_key: Option<String>,
}

/// A clan row as the spreadsheet backend returns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteClan {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A member row as the spreadsheet backend returns it. Loosely typed on
/// purpose: sheet columns come and go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteMember {
    pub id: i64,
    #[serde(default)]
    pub clan_id: Option<i64>,
    pub name: String,
    #[serde(default, rename = "className")]
    pub class_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// One attendance cell: member, ISO date, present flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceMark {
    pub member_id: i64,
    /// ISO date, `YYYY-MM-DD`
    pub date: String,
    pub present: bool,
    pub clan_id: i64,
}

/// List endpoints answer with either a bare array or `{ "items": [...] }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListResponse<T> {
    Items { items: Vec<T> },
    Array(Vec<T>),
}

impl<T> ListResponse<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Items { items } => items,
            ListResponse::Array(items) => items,
        }
    }
}

/// Remote roster service client
pub struct SheetsClient {
    client: reqwest::Client,
    config: RemoteConfig,
}

impl SheetsClient {
    pub fn new(config: RemoteConfig) -> RosterResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("clan-roster/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RosterError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> RosterResult<T> {
        let url = format!("{}{}", self.config.base_url, path);
        let mut request = self.client.post(&url).json(&body);
        if let Some(ref key) = self.config.moderator_key {
            request = request.header(MOD_KEY_HEADER, key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(RosterError::with_details(
                crate::error::RosterErrorCode::NetworkError,
                format!("Remote roster service returned status {}", status),
                format!("{}: {}", path, text),
            ));
        }

        response.json::<T>().await.map_err(RosterError::from)
    }

    /// List clans from the spreadsheet
    pub async fn list_clans(&self) -> RosterResult<Vec<RemoteClan>> {
        let response: ListResponse<RemoteClan> =
            self.post("/api/clans", json!({ "action": "list" })).await?;
        Ok(response.into_vec())
    }

    /// Create a clan row. The name is trimmed; empty names are rejected
    /// locally before any request goes out.
    pub async fn create_clan(&self, name: &str) -> RosterResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::validation("Clan name must not be empty"));
        }
        self.post::<serde_json::Value>("/api/clans", json!({ "action": "create", "name": name }))
            .await?;
        Ok(())
    }

    /// Delete a clan row
    pub async fn delete_clan(&self, clan_id: i64) -> RosterResult<()> {
        self.post::<serde_json::Value>("/api/clans", json!({ "action": "delete", "id": clan_id }))
            .await?;
        Ok(())
    }

    /// List members of one clan
    pub async fn list_members(&self, clan_id: i64) -> RosterResult<Vec<RemoteMember>> {
        let response: ListResponse<RemoteMember> = self
            .post("/api/members", json!({ "action": "list", "clan_id": clan_id }))
            .await?;
        Ok(response.into_vec())
    }

    /// Write a week of attendance marks in one batch
    pub async fn mark_attendance(
        &self,
        week_start: &str,
        week_end: &str,
        clan_id: i64,
        items: &[AttendanceMark],
    ) -> RosterResult<()> {
        self.post::<serde_json::Value>(
            "/api/attendance",
            json!({
                "action": "batch_mark",
                "weekStart": week_start,
                "weekEnd": week_end,
                "clan_id": clan_id,
                "items": items,
            }),
        )
        .await?;
        tracing::debug!(clan_id, marks = items.len(), "attendance batch saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_bare_array() {
        let json = r#"[{"id": 1, "name": "Alpha"}, {"id": 2, "name": "Beta"}]"#;
        let parsed: ListResponse<RemoteClan> = serde_json::from_str(json).unwrap();
        let clans = parsed.into_vec();
        assert_eq!(clans.len(), 2);
        assert_eq!(clans[0].name, "Alpha");
        assert!(clans[0].created_at.is_none());
    }

    #[test]
    fn test_list_response_items_object() {
        let json = r#"{"items": [{"id": 7, "name": "Gamma", "created_at": "2024-05-01T00:00:00Z"}]}"#;
        let parsed: ListResponse<RemoteClan> = serde_json::from_str(json).unwrap();
        let clans = parsed.into_vec();
        assert_eq!(clans.len(), 1);
        assert_eq!(clans[0].id, 7);
        assert_eq!(clans[0].created_at.as_deref(), Some("2024-05-01T00:00:00Z"));
    }

    #[test]
    fn test_remote_member_tolerates_missing_columns() {
        let json = r#"{"id": 3, "name": "Jorge", "className": "guerrero"}"#;
        let member: RemoteMember = serde_json::from_str(json).unwrap();
        assert_eq!(member.class_name.as_deref(), Some("guerrero"));
        assert!(member.clan_id.is_none());
        assert!(member.status.is_none());
    }

    #[test]
    fn test_attendance_mark_wire_shape() {
        let mark = AttendanceMark {
            member_id: 5,
            date: "2024-06-03".to_string(),
            present: true,
            clan_id: 1,
        };
        let json = serde_json::to_value(&mark).unwrap();
        assert_eq!(json["member_id"], 5);
        assert_eq!(json["date"], "2024-06-03");
        assert_eq!(json["present"], true);
        assert_eq!(json["clan_id"], 1);
    }

    #[test]
    fn test_client_builds_with_and_without_key() {
        let client = SheetsClient::new(RemoteConfig {
            base_url: "https://example.test".to_string(),
            moderator_key: Some("secret".to_string()),
        });
        assert!(client.is_ok());

        let client = SheetsClient::new(RemoteConfig {
            base_url: "https://example.test".to_string(),
            moderator_key: None,
        });
        assert!(client.is_ok());
    }
}
