//! External service port traits (LLM, narration, cloud backup).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use taleforge_domain::{
    BackupSummary, Character, CharacterSnapshot, Combat, GameState, LeaderboardEntry,
};

use super::error::{BackupError, LlmError, NarratorError};

// =============================================================================
// LLM Types
// =============================================================================

#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// The conversation history
    pub messages: Vec<ChatMessage>,
    /// System prompt / context
    pub system_prompt: Option<String>,
    /// Temperature for response generation (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

impl LlmRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            system_prompt: None,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::System => "system",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// The generated text content
    pub content: String,
    pub finish_reason: FinishReason,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmPort: Send + Sync {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;
}

// =============================================================================
// Narration
// =============================================================================

/// Natural-language narration of game events.
///
/// Every call may fail; callers substitute fallback text rather than surfacing
/// the failure to the player.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NarratorPort: Send + Sync {
    async fn generate_narrative(
        &self,
        character: &Character,
        session: &GameState,
        action: &str,
    ) -> Result<String, NarratorError>;

    async fn generate_combat_narrative(
        &self,
        character: &Character,
        combat: &Combat,
        action: &str,
    ) -> Result<String, NarratorError>;

    async fn generate_introduction(&self, character: &Character) -> Result<String, NarratorError>;

    async fn is_available(&self) -> bool;
}

// =============================================================================
// Cloud Backup
// =============================================================================

/// Cloud mirror of characters and the leaderboard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackupPort: Send + Sync {
    /// Upsert a snapshot keyed by `(user_id, character_name)`.
    async fn backup(&self, snapshot: &CharacterSnapshot) -> Result<(), BackupError>;

    async fn restore(
        &self,
        user_id: &str,
        character_name: &str,
    ) -> Result<Option<CharacterSnapshot>, BackupError>;

    /// Every backup held for `user_id`, most recent first.
    async fn list(&self, user_id: &str) -> Result<Vec<BackupSummary>, BackupError>;

    /// Upsert a leaderboard entry keyed by character id.
    async fn submit_score(&self, entry: &LeaderboardEntry) -> Result<(), BackupError>;

    /// Top entries by level, then experience. `limit` is at most 100.
    async fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, BackupError>;
}
