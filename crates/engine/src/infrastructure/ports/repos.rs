//! Document store ports.
//!
//! Both stores behave as key-value document stores: `save` is an upsert keyed by
//! the document's id, so repeated saves overwrite in place.

use async_trait::async_trait;
use taleforge_domain::{Character, CharacterId, GameState};

use super::error::RepoError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError>;
    async fn get_by_name(&self, name: &str) -> Result<Option<Character>, RepoError>;
    async fn list(&self) -> Result<Vec<Character>, RepoError>;
    async fn save(&self, character: &Character) -> Result<(), RepoError>;
    /// Returns whether a character was removed.
    async fn delete(&self, id: CharacterId) -> Result<bool, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameStateRepo: Send + Sync {
    async fn get_by_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<GameState>, RepoError>;
    /// Upsert keyed by `character_id`.
    async fn save(&self, state: &GameState) -> Result<(), RepoError>;
    /// Returns whether a session was removed.
    async fn delete_by_character(&self, character_id: CharacterId) -> Result<bool, RepoError>;
}
