//! Narration with fallbacks.

use std::sync::Arc;

use taleforge_domain::{Character, Combat, GameState};

use crate::infrastructure::ports::NarratorPort;

/// Shown in place of narration whenever the narrator fails.
pub const FALLBACK_NARRATIVE: &str =
    "The mists of fate cloud your vision... (The narrator is momentarily unavailable.)";

/// Narrator wrapper that never fails: errors become fallback text.
pub struct NarratorService {
    narrator: Arc<dyn NarratorPort>,
}

impl NarratorService {
    pub fn new(narrator: Arc<dyn NarratorPort>) -> Self {
        Self { narrator }
    }

    pub async fn narrate(
        &self,
        character: &Character,
        session: &GameState,
        action: &str,
    ) -> String {
        match self
            .narrator
            .generate_narrative(character, session, action)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    character_id = %character.id,
                    error = %e,
                    "Narration failed, using fallback"
                );
                FALLBACK_NARRATIVE.to_string()
            }
        }
    }

    /// Combat flavor text, or `None` if the narrator fails.
    pub async fn combat_flavor(
        &self,
        character: &Character,
        combat: &Combat,
        action: &str,
    ) -> Option<String> {
        match self
            .narrator
            .generate_combat_narrative(character, combat, action)
            .await
        {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(character_id = %character.id, error = %e, "Combat narration failed");
                None
            }
        }
    }

    pub async fn introduce(&self, character: &Character) -> String {
        match self.narrator.generate_introduction(character).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    character_id = %character.id,
                    error = %e,
                    "Introduction failed, using fallback"
                );
                FALLBACK_NARRATIVE.to_string()
            }
        }
    }

    pub async fn is_available(&self) -> bool {
        self.narrator.is_available().await
    }
}
