//! In-memory document stores for development and testing.
//!
//! Each store is a map from id to an owned document. Reads hand out clones, so
//! callers never alias stored records.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use taleforge_domain::{Character, CharacterId, GameState};

use crate::infrastructure::ports::{CharacterRepo, GameStateRepo, RepoError};

#[derive(Default)]
pub struct InMemoryCharacterRepo {
    characters: RwLock<HashMap<CharacterId, Character>>,
}

impl InMemoryCharacterRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CharacterRepo for InMemoryCharacterRepo {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        Ok(self.characters.read().await.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Character>, RepoError> {
        Ok(self
            .characters
            .read()
            .await
            .values()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Character>, RepoError> {
        let mut characters: Vec<Character> =
            self.characters.read().await.values().cloned().collect();
        characters.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(characters)
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        self.characters
            .write()
            .await
            .insert(character.id, character.clone());
        Ok(())
    }

    async fn delete(&self, id: CharacterId) -> Result<bool, RepoError> {
        Ok(self.characters.write().await.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryGameStateRepo {
    sessions: RwLock<HashMap<CharacterId, GameState>>,
}

impl InMemoryGameStateRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameStateRepo for InMemoryGameStateRepo {
    async fn get_by_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<GameState>, RepoError> {
        Ok(self.sessions.read().await.get(&character_id).cloned())
    }

    async fn save(&self, state: &GameState) -> Result<(), RepoError> {
        self.sessions
            .write()
            .await
            .insert(state.character_id, state.clone());
        Ok(())
    }

    async fn delete_by_character(&self, character_id: CharacterId) -> Result<bool, RepoError> {
        Ok(self.sessions.write().await.remove(&character_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use taleforge_domain::CharacterClass;

    #[tokio::test]
    async fn repeated_saves_overwrite_in_place() {
        let repo = InMemoryCharacterRepo::new();
        let mut c = Character::create("Ada", CharacterClass::Mage, &Default::default(), Utc::now());
        repo.save(&c).await.expect("save");
        c.gold = 99;
        repo.save(&c).await.expect("save again");

        let all = repo.list().await.expect("list");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].gold, 99);
        assert_eq!(
            repo.get_by_name("Ada").await.expect("by name").map(|c| c.id),
            Some(c.id)
        );
        assert!(repo.delete(c.id).await.expect("delete"));
        assert!(!repo.delete(c.id).await.expect("delete twice"));
    }

    #[tokio::test]
    async fn sessions_are_keyed_by_character() {
        let repo = InMemoryGameStateRepo::new();
        let character_id = CharacterId::new();
        let state = GameState::new(character_id, Utc::now());
        repo.save(&state).await.expect("save");
        repo.save(&state).await.expect("save again");

        let loaded = repo
            .get_by_character(character_id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(loaded.id, state.id);
        assert!(repo.delete_by_character(character_id).await.expect("delete"));
        assert!(repo
            .get_by_character(character_id)
            .await
            .expect("get")
            .is_none());
    }
}
