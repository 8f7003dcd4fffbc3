//! Session Store: one `GameState` per character, created on first access.

use std::sync::Arc;

use taleforge_domain::{CharacterId, GameState, MessageRole};

use crate::infrastructure::ports::{ClockPort, GameStateRepo, RepoError};

pub struct SessionStore {
    repo: Arc<dyn GameStateRepo>,
    clock: Arc<dyn ClockPort>,
}

impl SessionStore {
    pub fn new(repo: Arc<dyn GameStateRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { repo, clock }
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    pub async fn get_by_character_id(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<GameState>, RepoError> {
        self.repo.get_by_character(character_id).await
    }

    /// Load the character's session, creating and persisting a fresh one if absent.
    pub async fn get_or_create(&self, character_id: CharacterId) -> Result<GameState, RepoError> {
        if let Some(state) = self.repo.get_by_character(character_id).await? {
            return Ok(state);
        }

        let state = GameState::new(character_id, self.clock.now());
        self.repo.save(&state).await?;
        tracing::debug!(character_id = %character_id, "Created game session");
        Ok(state)
    }

    /// Upsert, stamping `last_updated`.
    pub async fn save(&self, state: &mut GameState) -> Result<(), RepoError> {
        state.last_updated = self.clock.now();
        self.repo.save(state).await
    }

    pub async fn delete(&self, character_id: CharacterId) -> Result<bool, RepoError> {
        self.repo.delete_by_character(character_id).await
    }

    /// Append a timestamped message to the character's session, trim the
    /// history to the most recent 50 messages and persist.
    pub async fn append_message(
        &self,
        character_id: CharacterId,
        role: MessageRole,
        content: impl Into<String>,
    ) -> Result<GameState, RepoError> {
        let mut state = self.get_or_create(character_id).await?;
        state.push_message(role, content, self.clock.now());
        self.save(&mut state).await?;
        Ok(state)
    }
}
