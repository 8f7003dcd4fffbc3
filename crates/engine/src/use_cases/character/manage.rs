//! Character listing, lookup and deletion.

use std::sync::Arc;

use taleforge_domain::{Character, CharacterId};

use super::CharacterError;
use crate::repositories::{CharacterStore, SessionStore};

pub struct ManageCharacters {
    characters: Arc<CharacterStore>,
    sessions: Arc<SessionStore>,
}

impl ManageCharacters {
    pub fn new(characters: Arc<CharacterStore>, sessions: Arc<SessionStore>) -> Self {
        Self {
            characters,
            sessions,
        }
    }

    pub async fn get(&self, id: CharacterId) -> Result<Option<Character>, CharacterError> {
        Ok(self.characters.get(id).await?)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Character>, CharacterError> {
        Ok(self.characters.get_by_name(name).await?)
    }

    pub async fn list(&self) -> Result<Vec<Character>, CharacterError> {
        Ok(self.characters.get_all().await?)
    }

    /// Delete a character along with its session. Returns whether the
    /// character existed.
    pub async fn delete(&self, id: CharacterId) -> Result<bool, CharacterError> {
        let removed = self.characters.delete(id).await?;
        self.sessions.delete(id).await?;
        if removed {
            tracing::info!(character_id = %id, "Character deleted");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use taleforge_domain::CharacterClass;

    use crate::test_fixtures::{Harness, RecordingNarrator};

    #[tokio::test]
    async fn delete_removes_character_and_session() {
        let h = Harness::new(RecordingNarrator::replying("..."));
        let c = h
            .seed(Character::create("Ada", CharacterClass::Rogue, &Default::default(), Utc::now()))
            .await;
        h.sessions.get_or_create(c.id).await.expect("session");

        let manage = ManageCharacters::new(h.characters.clone(), h.sessions.clone());
        assert_eq!(manage.list().await.expect("list").len(), 1);
        assert!(manage.find_by_name("Ada").await.expect("find").is_some());

        assert!(manage.delete(c.id).await.expect("delete"));
        assert!(manage.get(c.id).await.expect("get").is_none());
        assert!(h
            .sessions
            .get_by_character_id(c.id)
            .await
            .expect("get session")
            .is_none());
        assert!(!manage.delete(c.id).await.expect("delete again"));
    }
}
