//! Cloud mirror records: character backups and leaderboard entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Character, CharacterClass};
use crate::ids::CharacterId;

/// Largest leaderboard page the backup service will serve.
pub const MAX_LEADERBOARD_SIZE: usize = 100;

/// Point-in-time copy of a character, keyed by `(user_id, character_name)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSnapshot {
    pub user_id: String,
    pub character_name: String,
    pub character: Character,
    pub taken_at: DateTime<Utc>,
}

impl CharacterSnapshot {
    pub fn of(user_id: impl Into<String>, character: &Character, taken_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            character_name: character.name.clone(),
            character: character.clone(),
            taken_at,
        }
    }
}

/// One row of a user's backup listing, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSummary {
    pub id: String,
    pub character_name: String,
    pub level: u32,
    pub last_backup_date: Option<DateTime<Utc>>,
}

/// Leaderboard row, keyed by character id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub character_id: CharacterId,
    pub character_name: String,
    pub class: CharacterClass,
    pub level: u32,
    pub experience: u32,
}

impl From<&Character> for LeaderboardEntry {
    fn from(character: &Character) -> Self {
        Self {
            character_id: character.id,
            character_name: character.name.clone(),
            class: character.class,
            level: character.level,
            experience: character.experience,
        }
    }
}

/// Clamp a requested leaderboard size to `1..=100`.
pub fn clamp_leaderboard_limit(limit: usize) -> usize {
    limit.clamp(1, MAX_LEADERBOARD_SIZE)
}

/// Order by level, then experience, both descending, and keep the top `limit`.
pub fn rank_leaderboard(mut entries: Vec<LeaderboardEntry>, limit: usize) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| {
        b.level
            .cmp(&a.level)
            .then_with(|| b.experience.cmp(&a.experience))
    });
    entries.truncate(clamp_leaderboard_limit(limit));
    entries
}
