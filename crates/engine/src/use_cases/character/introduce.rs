//! Opening narration for a character.

use std::sync::Arc;

use taleforge_domain::{CharacterId, MessageRole};

use super::CharacterError;
use crate::repositories::{CharacterStore, NarratorService, SessionStore};

pub struct IntroduceCharacter {
    characters: Arc<CharacterStore>,
    sessions: Arc<SessionStore>,
    narrator: Arc<NarratorService>,
}

impl IntroduceCharacter {
    pub fn new(
        characters: Arc<CharacterStore>,
        sessions: Arc<SessionStore>,
        narrator: Arc<NarratorService>,
    ) -> Self {
        Self {
            characters,
            sessions,
            narrator,
        }
    }

    /// Returns `None` when the character does not exist.
    pub async fn execute(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<String>, CharacterError> {
        let Some(character) = self.characters.get(character_id).await? else {
            return Ok(None);
        };

        let introduction = self.narrator.introduce(&character).await;

        let mut session = self.sessions.get_or_create(character_id).await?;
        session.push_message(MessageRole::Assistant, introduction.clone(), self.sessions.now());
        session.current_narrative = introduction.clone();
        self.sessions.save(&mut session).await?;

        Ok(Some(introduction))
    }
}
