//! # Taleforge Domain
//!
//! Characters, items and per-character sessions, plus the arithmetic of
//! character creation, combat and progression. Nothing in this crate performs
//! I/O or draws random numbers; dice results are supplied by the engine.

pub mod entities;
pub mod error;
pub mod ids;
pub mod leaderboard;
pub mod rules;

pub use entities::{
    Ability, AbilityOverrides, AbilityScores, Character, CharacterClass, Combat,
    ConversationMessage, DefeatPenalty, EquipmentSlot, GameState, Item, ItemBonuses, ItemType,
    LevelUp, MessageRole, DEFAULT_LOCATION, DEFAULT_NARRATIVE, MAX_CONVERSATION_HISTORY,
};
pub use error::DomainError;
pub use ids::{CharacterId, GameStateId, ItemId};
pub use leaderboard::{
    clamp_leaderboard_limit, rank_leaderboard, BackupSummary, CharacterSnapshot, LeaderboardEntry,
    MAX_LEADERBOARD_SIZE,
};
pub use rules::{ability_modifier, EnemyStats};
