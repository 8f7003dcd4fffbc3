//! Create character use case.

use std::sync::Arc;

use taleforge_domain::{AbilityOverrides, Character, CharacterClass, CharacterId};

use super::CharacterError;
use crate::infrastructure::ports::ClockPort;
use crate::repositories::{CharacterStore, Dice, SessionStore};

/// Creates a level 1 character and its session.
pub struct CreateCharacter {
    characters: Arc<CharacterStore>,
    sessions: Arc<SessionStore>,
    dice: Arc<Dice>,
    clock: Arc<dyn ClockPort>,
}

impl CreateCharacter {
    pub fn new(
        characters: Arc<CharacterStore>,
        sessions: Arc<SessionStore>,
        dice: Arc<Dice>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            characters,
            sessions,
            dice,
            clock,
        }
    }

    /// Ability scores start at 10; overrides replace defaults before class
    /// bonuses apply. Max HP and armor class derive from the final scores.
    pub async fn execute(
        &self,
        name: &str,
        class: CharacterClass,
        overrides: AbilityOverrides,
    ) -> Result<Character, CharacterError> {
        let mut character = Character::create(name, class, &overrides, self.clock.now());
        character.id = CharacterId::from_uuid(self.dice.uuid());

        self.characters.save(&mut character).await?;
        self.sessions.get_or_create(character.id).await?;

        tracing::info!(
            character_id = %character.id,
            name = %character.name,
            class = %character.class,
            max_hit_points = character.max_hit_points,
            "Character created"
        );
        Ok(character)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taleforge_domain::Ability;

    use crate::test_fixtures::{Harness, RecordingNarrator};

    fn use_case(h: &Harness) -> CreateCharacter {
        CreateCharacter::new(
            h.characters.clone(),
            h.sessions.clone(),
            h.dice.clone(),
            h.clock.clone(),
        )
    }

    #[tokio::test]
    async fn warrior_with_default_constitution_has_22_hit_points() {
        let h = Harness::new(RecordingNarrator::replying("..."));
        let overrides = AbilityOverrides::default().set(Ability::Constitution, 10);

        let c = use_case(&h)
            .execute("Brom", CharacterClass::Warrior, overrides)
            .await
            .expect("create");

        assert_eq!(c.abilities.constitution, 12);
        assert_eq!(c.max_hit_points, 22);
        assert_eq!(c.hit_points, 22);
        assert_eq!(c.last_played_at, h.clock.0);
    }

    #[tokio::test]
    async fn persists_character_and_creates_session() {
        let h = Harness::new(RecordingNarrator::replying("..."));
        let c = use_case(&h)
            .execute("Mira", CharacterClass::Mage, AbilityOverrides::default())
            .await
            .expect("create");

        let stored = h.characters.get(c.id).await.expect("get").expect("stored");
        assert_eq!(stored, c);
        let session = h
            .sessions
            .get_by_character_id(c.id)
            .await
            .expect("get session")
            .expect("session created");
        assert_eq!(session.current_scene, "Town Square");
    }
}
