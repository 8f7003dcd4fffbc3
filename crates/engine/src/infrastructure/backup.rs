//! HTTP client for the cloud backup and leaderboard service.
//!
//! Routes:
//! - `POST api/CharacterSync/backup`
//! - `GET  api/CharacterSync/restore/{userId}/{characterName}`
//! - `GET  api/CharacterSync/list/{userId}`
//! - `POST api/Leaderboard/update`
//! - `GET  api/Leaderboard/top/{count}`

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use taleforge_domain::{
    clamp_leaderboard_limit, rank_leaderboard, BackupSummary, Character, CharacterId,
    CharacterSnapshot, LeaderboardEntry,
};

use crate::infrastructure::ports::{BackupError, BackupPort};

#[derive(Clone)]
pub struct HttpBackupClient {
    client: Client,
    base_url: String,
}

impl HttpBackupClient {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `{base}/api/{segments..}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackupError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| BackupError::RequestFailed(format!("{}: {e}", self.base_url)))?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                BackupError::RequestFailed(format!("{} cannot be a base URL", self.base_url))
            })?;
            path.pop_if_empty().push("api").extend(segments);
        }
        Ok(url)
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, BackupError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(BackupError::Status {
        status: status.as_u16(),
        message,
    })
}

fn request_failed(e: reqwest::Error) -> BackupError {
    BackupError::RequestFailed(e.to_string())
}

fn invalid(e: impl ToString) -> BackupError {
    BackupError::InvalidResponse(e.to_string())
}

/// Server timestamps may come back without an offset; those are UTC.
fn parse_server_time(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").map(|t| t.and_utc())
        })
        .ok()
}

// =============================================================================
// Wire types
// =============================================================================

/// Backup record. The character travels as a JSON string in `characterData`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CharacterBackupDto {
    #[serde(default)]
    id: String,
    user_id: String,
    character_name: String,
    level: u32,
    character_data: String,
    #[serde(default)]
    last_backup_date: Option<String>,
}

impl CharacterBackupDto {
    fn from_snapshot(snapshot: &CharacterSnapshot) -> Result<Self, BackupError> {
        let character_data = serde_json::to_string(&snapshot.character)
            .map_err(|e| BackupError::RequestFailed(e.to_string()))?;
        Ok(Self {
            id: String::new(),
            user_id: snapshot.user_id.clone(),
            character_name: snapshot.character_name.clone(),
            level: snapshot.character.level,
            character_data,
            last_backup_date: Some(snapshot.taken_at.to_rfc3339()),
        })
    }

    fn into_snapshot(self) -> Result<CharacterSnapshot, BackupError> {
        let character: Character = serde_json::from_str(&self.character_data).map_err(invalid)?;
        let taken_at = self
            .last_backup_date
            .as_deref()
            .and_then(parse_server_time)
            .or(character.last_synced_at)
            .unwrap_or(character.last_played_at);
        Ok(CharacterSnapshot {
            user_id: self.user_id,
            character_name: self.character_name,
            character,
            taken_at,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackupSummaryDto {
    id: String,
    character_name: String,
    level: u32,
    #[serde(default)]
    last_backup_date: Option<String>,
}

impl From<BackupSummaryDto> for BackupSummary {
    fn from(dto: BackupSummaryDto) -> Self {
        Self {
            id: dto.id,
            character_name: dto.character_name,
            level: dto.level,
            last_backup_date: dto.last_backup_date.as_deref().and_then(parse_server_time),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeaderboardEntryDto {
    #[serde(default)]
    id: String,
    character_id: String,
    character_name: String,
    character_class: String,
    level: u32,
    experience: u32,
}

impl From<&LeaderboardEntry> for LeaderboardEntryDto {
    fn from(entry: &LeaderboardEntry) -> Self {
        Self {
            id: String::new(),
            character_id: entry.character_id.to_string(),
            character_name: entry.character_name.clone(),
            character_class: entry.class.to_string(),
            level: entry.level,
            experience: entry.experience,
        }
    }
}

impl TryFrom<LeaderboardEntryDto> for LeaderboardEntry {
    type Error = BackupError;

    fn try_from(dto: LeaderboardEntryDto) -> Result<Self, Self::Error> {
        let character_id = dto
            .character_id
            .parse::<uuid::Uuid>()
            .map(CharacterId::from_uuid)
            .map_err(invalid)?;
        Ok(Self {
            character_id,
            character_name: dto.character_name,
            class: dto.character_class.parse().map_err(invalid)?,
            level: dto.level,
            experience: dto.experience,
        })
    }
}

// =============================================================================
// Port
// =============================================================================

#[async_trait]
impl BackupPort for HttpBackupClient {
    async fn backup(&self, snapshot: &CharacterSnapshot) -> Result<(), BackupError> {
        let body = CharacterBackupDto::from_snapshot(snapshot)?;
        let response = self
            .client
            .post(self.endpoint(&["CharacterSync", "backup"])?)
            .json(&body)
            .send()
            .await
            .map_err(request_failed)?;
        check(response).await?;
        Ok(())
    }

    async fn restore(
        &self,
        user_id: &str,
        character_name: &str,
    ) -> Result<Option<CharacterSnapshot>, BackupError> {
        let url = self.endpoint(&["CharacterSync", "restore", user_id, character_name])?;
        let response = self.client.get(url).send().await.map_err(request_failed)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let dto = check(response)
            .await?
            .json::<CharacterBackupDto>()
            .await
            .map_err(invalid)?;
        dto.into_snapshot().map(Some)
    }

    async fn list(&self, user_id: &str) -> Result<Vec<BackupSummary>, BackupError> {
        let url = self.endpoint(&["CharacterSync", "list", user_id])?;
        let response = self.client.get(url).send().await.map_err(request_failed)?;

        let rows = check(response)
            .await?
            .json::<Vec<BackupSummaryDto>>()
            .await
            .map_err(invalid)?;
        Ok(rows.into_iter().map(BackupSummary::from).collect())
    }

    async fn submit_score(&self, entry: &LeaderboardEntry) -> Result<(), BackupError> {
        let response = self
            .client
            .post(self.endpoint(&["Leaderboard", "update"])?)
            .json(&LeaderboardEntryDto::from(entry))
            .send()
            .await
            .map_err(request_failed)?;
        check(response).await?;
        Ok(())
    }

    async fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, BackupError> {
        let limit = clamp_leaderboard_limit(limit);
        let count = limit.to_string();
        let url = self.endpoint(&["Leaderboard", "top", count.as_str()])?;
        let response = self.client.get(url).send().await.map_err(request_failed)?;

        let rows = check(response)
            .await?
            .json::<Vec<LeaderboardEntryDto>>()
            .await
            .map_err(invalid)?;
        let entries = rows
            .into_iter()
            .map(LeaderboardEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        // Ordering is level desc, then experience desc, regardless of the server.
        Ok(rank_leaderboard(entries, limit))
    }
}
