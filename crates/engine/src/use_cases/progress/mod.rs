//! Quest tracking, play time and session bookkeeping.

use std::sync::Arc;

use taleforge_domain::{Character, CharacterId, DomainError};

use crate::infrastructure::ports::RepoError;
use crate::repositories::{CharacterStore, SessionStore};

pub struct ProgressUseCases {
    pub track: Arc<TrackProgress>,
}

impl ProgressUseCases {
    pub fn new(track: Arc<TrackProgress>) -> Self {
        Self { track }
    }
}

pub struct TrackProgress {
    characters: Arc<CharacterStore>,
    sessions: Arc<SessionStore>,
}

impl TrackProgress {
    pub fn new(characters: Arc<CharacterStore>, sessions: Arc<SessionStore>) -> Self {
        Self {
            characters,
            sessions,
        }
    }

    /// Returns false if the quest was already active.
    pub async fn start_quest(
        &self,
        character_id: CharacterId,
        quest_id: &str,
    ) -> Result<bool, QuestError> {
        let mut character = self.load(character_id).await?;
        let started = character.start_quest(quest_id);
        if started {
            self.characters.save(&mut character).await?;
            tracing::info!(character_id = %character_id, quest = quest_id, "Quest started");
        }
        Ok(started)
    }

    pub async fn complete_quest(
        &self,
        character_id: CharacterId,
        quest_id: &str,
    ) -> Result<(), QuestError> {
        let mut character = self.load(character_id).await?;
        character.complete_quest(quest_id)?;
        self.characters.save(&mut character).await?;
        tracing::info!(character_id = %character_id, quest = quest_id, "Quest completed");
        Ok(())
    }

    /// Add minutes to the character's total play time. Returns the new total.
    pub async fn record_play_time(
        &self,
        character_id: CharacterId,
        minutes: u32,
    ) -> Result<u32, QuestError> {
        let mut character = self.load(character_id).await?;
        character.total_play_minutes = character.total_play_minutes.saturating_add(minutes);
        self.characters.save(&mut character).await?;
        Ok(character.total_play_minutes)
    }

    pub async fn set_flag(
        &self,
        character_id: CharacterId,
        key: &str,
        value: &str,
    ) -> Result<(), QuestError> {
        self.load(character_id).await?;
        let mut session = self.sessions.get_or_create(character_id).await?;
        session.session_flags.insert(key.to_string(), value.to_string());
        self.sessions.save(&mut session).await?;
        Ok(())
    }

    pub async fn get_flag(
        &self,
        character_id: CharacterId,
        key: &str,
    ) -> Result<Option<String>, QuestError> {
        Ok(self
            .sessions
            .get_by_character_id(character_id)
            .await?
            .and_then(|session| session.session_flags.get(key).cloned()))
    }

    pub async fn set_scene(
        &self,
        character_id: CharacterId,
        scene: &str,
    ) -> Result<(), QuestError> {
        self.load(character_id).await?;
        let mut session = self.sessions.get_or_create(character_id).await?;
        session.current_scene = scene.to_string();
        self.sessions.save(&mut session).await?;
        tracing::debug!(character_id = %character_id, scene, "Scene changed");
        Ok(())
    }

    async fn load(&self, character_id: CharacterId) -> Result<Character, QuestError> {
        self.characters
            .get(character_id)
            .await?
            .ok_or(QuestError::CharacterNotFound)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QuestError {
    #[error("Character not found")]
    CharacterNotFound,
    #[error("{0}")]
    Rule(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use taleforge_domain::CharacterClass;

    use crate::test_fixtures::{Harness, RecordingNarrator};

    async fn setup() -> (Harness, TrackProgress, Character) {
        let h = Harness::new(RecordingNarrator::replying("..."));
        let c = h
            .seed(Character::create("Ren", CharacterClass::Ranger, &Default::default(), h.clock.0))
            .await;
        let track = TrackProgress::new(h.characters.clone(), h.sessions.clone());
        (h, track, c)
    }

    #[tokio::test]
    async fn quests_move_from_active_to_completed() {
        let (h, track, c) = setup().await;

        assert!(track.start_quest(c.id, "rats-in-cellar").await.expect("start"));
        assert!(!track.start_quest(c.id, "rats-in-cellar").await.expect("restart"));
        track.complete_quest(c.id, "rats-in-cellar").await.expect("complete");

        let stored = h.characters.get(c.id).await.expect("get").expect("stored");
        assert!(stored.active_quests.is_empty());
        assert!(stored.completed_quests.contains("rats-in-cellar"));

        let again = track.complete_quest(c.id, "rats-in-cellar").await;
        assert!(matches!(again, Err(QuestError::Rule(_))));
    }

    #[tokio::test]
    async fn play_time_accumulates() {
        let (_h, track, c) = setup().await;
        track.record_play_time(c.id, 25).await.expect("record");
        assert_eq!(track.record_play_time(c.id, 10).await.expect("record"), 35);
    }

    #[tokio::test]
    async fn flags_and_scene_live_on_the_session() {
        let (h, track, c) = setup().await;

        assert_eq!(track.get_flag(c.id, "door").await.expect("get"), None);
        track.set_flag(c.id, "door", "open").await.expect("set");
        track.set_scene(c.id, "Old Mill").await.expect("scene");

        assert_eq!(track.get_flag(c.id, "door").await.expect("get").as_deref(), Some("open"));
        let session = h.sessions.get_or_create(c.id).await.expect("session");
        assert_eq!(session.current_scene, "Old Mill");
    }

    #[tokio::test]
    async fn unknown_character_is_an_error() {
        let (_h, track, _c) = setup().await;
        let result = track.set_scene(CharacterId::new(), "Nowhere").await;
        assert!(matches!(result, Err(QuestError::CharacterNotFound)));
    }
}
