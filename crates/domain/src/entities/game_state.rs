//! Per-character session state: conversation history, scene and combat.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::character::DEFAULT_LOCATION;
use crate::ids::{CharacterId, GameStateId};
use crate::rules::EnemyStats;

/// Maximum number of conversation messages kept per session.
pub const MAX_CONVERSATION_HISTORY: usize = 50;

/// Narrative shown before the first action of a new session.
pub const DEFAULT_NARRATIVE: &str =
    "You stand in the bustling town square. Merchants call out their wares, and adventure awaits.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// An active fight. Present on a session only while the character is fighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combat {
    pub enemy_name: String,
    pub enemy_hit_points: i32,
    pub enemy_max_hit_points: i32,
    pub enemy_armor_class: i32,
    pub enemy_damage: i32,
    pub player_initial_hit_points: i32,
    pub round: u32,
    pub is_player_turn: bool,
}

impl Combat {
    /// Begin a fight against an enemy whose stats derive from `enemy_level`.
    pub fn start(enemy_name: impl Into<String>, enemy_level: i32, player_hit_points: i32) -> Self {
        let stats = EnemyStats::for_level(enemy_level);
        Self {
            enemy_name: enemy_name.into(),
            enemy_hit_points: stats.hit_points,
            enemy_max_hit_points: stats.hit_points,
            enemy_armor_class: stats.armor_class,
            enemy_damage: stats.damage,
            player_initial_hit_points: player_hit_points,
            round: 1,
            is_player_turn: true,
        }
    }

    pub fn is_enemy_defeated(&self) -> bool {
        self.enemy_hit_points <= 0
    }
}

/// Session document, one per character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub id: GameStateId,
    pub character_id: CharacterId,
    pub conversation_history: Vec<ConversationMessage>,
    pub current_scene: String,
    pub current_narrative: String,
    pub active_combat: Option<Combat>,
    #[serde(default)]
    pub session_flags: BTreeMap<String, String>,
    pub last_updated: DateTime<Utc>,
}

impl GameState {
    pub fn new(character_id: CharacterId, now: DateTime<Utc>) -> Self {
        Self {
            id: GameStateId::new(),
            character_id,
            conversation_history: Vec::new(),
            current_scene: DEFAULT_LOCATION.to_string(),
            current_narrative: DEFAULT_NARRATIVE.to_string(),
            active_combat: None,
            session_flags: BTreeMap::new(),
            last_updated: now,
        }
    }

    pub fn in_combat(&self) -> bool {
        self.active_combat.is_some()
    }

    /// Append a message and enforce the history cap.
    pub fn push_message(
        &mut self,
        role: MessageRole,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) {
        self.conversation_history.push(ConversationMessage {
            role,
            content: content.into(),
            timestamp,
        });
        self.trim_history(MAX_CONVERSATION_HISTORY);
    }

    /// Keep the `cap` most recent messages, in chronological order.
    ///
    /// Messages are ranked newest first, the top `cap` are kept, and the survivors
    /// are re-sorted oldest first. With a skewed clock this differs from dropping
    /// the head of the list. Equal timestamps rank by insertion order, later
    /// insertions counting as more recent.
    pub fn trim_history(&mut self, cap: usize) {
        if self.conversation_history.len() <= cap {
            return;
        }

        let mut ranked: Vec<(usize, ConversationMessage)> =
            std::mem::take(&mut self.conversation_history)
                .into_iter()
                .enumerate()
                .collect();

        ranked.sort_by(|(ia, a), (ib, b)| b.timestamp.cmp(&a.timestamp).then(ib.cmp(ia)));
        ranked.truncate(cap);
        ranked.sort_by(|(ia, a), (ib, b)| a.timestamp.cmp(&b.timestamp).then(ia.cmp(ib)));

        self.conversation_history = ranked.into_iter().map(|(_, message)| message).collect();
    }

    /// The last `count` messages, oldest first.
    pub fn recent_messages(&self, count: usize) -> &[ConversationMessage] {
        let start = self.conversation_history.len().saturating_sub(count);
        &self.conversation_history[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn state() -> GameState {
        GameState::new(CharacterId::new(), Utc::now())
    }

    #[test]
    fn new_session_starts_in_town_square_without_combat() {
        let s = state();
        assert_eq!(s.current_scene, "Town Square");
        assert!(!s.in_combat());
        assert!(s.conversation_history.is_empty());
    }

    #[test]
    fn combat_starts_at_round_one_with_level_stats() {
        let combat = Combat::start("Goblin", 1, 17);
        assert_eq!(combat.enemy_hit_points, 30);
        assert_eq!(combat.enemy_max_hit_points, 30);
        assert_eq!(combat.enemy_armor_class, 11);
        assert_eq!(combat.enemy_damage, 7);
        assert_eq!(combat.player_initial_hit_points, 17);
        assert_eq!(combat.round, 1);
    }

    #[test]
    fn history_is_capped_at_fifty_most_recent() {
        let mut s = state();
        let start = Utc::now();
        for i in 0..60 {
            s.push_message(MessageRole::User, format!("m{i}"), start + Duration::seconds(i));
        }
        assert_eq!(s.conversation_history.len(), MAX_CONVERSATION_HISTORY);
        assert_eq!(s.conversation_history[0].content, "m10");
        assert_eq!(s.conversation_history[49].content, "m59");
        assert!(s
            .conversation_history
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn trimming_ranks_by_timestamp_not_position() {
        let mut s = state();
        let start = Utc::now();
        // A message stamped in the past (clock skew) arrives last.
        for i in 0..3 {
            s.conversation_history.push(ConversationMessage {
                role: MessageRole::User,
                content: format!("m{i}"),
                timestamp: start + Duration::seconds(10 + i),
            });
        }
        s.conversation_history.push(ConversationMessage {
            role: MessageRole::Assistant,
            content: "skewed".to_string(),
            timestamp: start,
        });

        s.trim_history(3);
        let contents: Vec<_> = s.conversation_history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["m0", "m1", "m2"]);
    }

    #[test]
    fn equal_timestamps_keep_latest_insertions() {
        let mut s = state();
        let now = Utc::now();
        for i in 0..55 {
            s.push_message(MessageRole::User, format!("m{i}"), now);
        }
        assert_eq!(s.conversation_history.len(), 50);
        assert_eq!(s.conversation_history[0].content, "m5");
        assert_eq!(s.conversation_history[49].content, "m54");
    }

    #[test]
    fn recent_messages_returns_tail() {
        let mut s = state();
        let now = Utc::now();
        for i in 0..4 {
            s.push_message(MessageRole::User, format!("m{i}"), now);
        }
        let recent: Vec<_> = s.recent_messages(2).iter().map(|m| m.content.clone()).collect();
        assert_eq!(recent, ["m2", "m3"]);
        assert_eq!(s.recent_messages(10).len(), 4);
    }
}
