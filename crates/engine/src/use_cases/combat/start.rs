//! Start combat use case.

use std::sync::Arc;

use taleforge_domain::{CharacterId, Combat};

use super::CombatError;
use crate::repositories::{CharacterStore, SessionStore};

pub struct StartCombat {
    characters: Arc<CharacterStore>,
    sessions: Arc<SessionStore>,
}

impl StartCombat {
    pub fn new(characters: Arc<CharacterStore>, sessions: Arc<SessionStore>) -> Self {
        Self {
            characters,
            sessions,
        }
    }

    /// Attach a fresh combat to the character's session, replacing any prior
    /// one. Returns `None` without touching storage if the character is unknown.
    pub async fn execute(
        &self,
        character_id: CharacterId,
        enemy_name: &str,
        enemy_level: i32,
    ) -> Result<Option<Combat>, CombatError> {
        let Some(character) = self.characters.get(character_id).await? else {
            return Ok(None);
        };

        let combat = Combat::start(enemy_name, enemy_level, character.hit_points);
        let mut session = self.sessions.get_or_create(character_id).await?;
        session.active_combat = Some(combat.clone());
        self.sessions.save(&mut session).await?;

        tracing::info!(
            character_id = %character_id,
            enemy = %combat.enemy_name,
            enemy_level,
            enemy_hit_points = combat.enemy_hit_points,
            "Combat started"
        );
        Ok(Some(combat))
    }
}
