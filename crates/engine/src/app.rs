//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::ports::{
    BackupPort, CharacterRepo, ClockPort, GameStateRepo, NarratorPort, RandomPort,
};
use crate::repositories::{CharacterStore, Dice, NarratorService, SessionStore};
use crate::use_cases;

/// Adapters the application is assembled from.
pub struct AppPorts {
    pub character_repo: Arc<dyn CharacterRepo>,
    pub game_state_repo: Arc<dyn GameStateRepo>,
    pub narrator: Arc<dyn NarratorPort>,
    /// Cloud sync is disabled when `None`.
    pub backup: Option<Arc<dyn BackupPort>>,
    pub clock: Arc<dyn ClockPort>,
    pub random: Arc<dyn RandomPort>,
    pub user_id: String,
}

/// Main application state.
///
/// Holds the stores and all use cases.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

/// Container for the stores and shared services.
pub struct Repositories {
    pub characters: Arc<CharacterStore>,
    pub sessions: Arc<SessionStore>,
    pub narrator: Arc<NarratorService>,
    pub dice: Arc<Dice>,
}

/// Container for all use cases.
pub struct UseCases {
    pub character: use_cases::CharacterUseCases,
    pub player_action: use_cases::PlayerActionUseCases,
    pub combat: use_cases::CombatUseCases,
    pub inventory: use_cases::InventoryUseCases,
    pub progress: use_cases::ProgressUseCases,
    pub sync: use_cases::SyncUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(ports: AppPorts) -> Self {
        let AppPorts {
            character_repo,
            game_state_repo,
            narrator,
            backup,
            clock,
            random,
            user_id,
        } = ports;

        let characters = Arc::new(CharacterStore::new(character_repo, clock.clone()));
        let sessions = Arc::new(SessionStore::new(game_state_repo, clock.clone()));
        let narrator = Arc::new(NarratorService::new(narrator));
        let dice = Arc::new(Dice::new(random));

        let character = use_cases::CharacterUseCases::new(
            Arc::new(use_cases::character::CreateCharacter::new(
                characters.clone(),
                sessions.clone(),
                dice.clone(),
                clock.clone(),
            )),
            Arc::new(use_cases::character::IntroduceCharacter::new(
                characters.clone(),
                sessions.clone(),
                narrator.clone(),
            )),
            Arc::new(use_cases::character::ManageCharacters::new(
                characters.clone(),
                sessions.clone(),
            )),
        );

        // Combat resolution is shared with action dispatch
        let resolve_round = Arc::new(use_cases::combat::ResolveCombatRound::new(
            characters.clone(),
            sessions.clone(),
            dice.clone(),
            narrator.clone(),
        ));
        let combat = use_cases::CombatUseCases::new(
            Arc::new(use_cases::combat::StartCombat::new(
                characters.clone(),
                sessions.clone(),
            )),
            resolve_round.clone(),
        );

        let player_action = use_cases::PlayerActionUseCases::new(Arc::new(
            use_cases::player_action::ProcessPlayerAction::new(
                characters.clone(),
                sessions.clone(),
                narrator.clone(),
                resolve_round,
            ),
        ));

        let inventory = use_cases::InventoryUseCases::new(
            Arc::new(use_cases::inventory::AddItem::new(characters.clone())),
            Arc::new(use_cases::inventory::EquipItem::new(characters.clone())),
            Arc::new(use_cases::inventory::UnequipItem::new(characters.clone())),
            Arc::new(use_cases::inventory::UseItem::new(characters.clone())),
        );

        let progress = use_cases::ProgressUseCases::new(Arc::new(
            use_cases::progress::TrackProgress::new(characters.clone(), sessions.clone()),
        ));

        let sync = use_cases::SyncUseCases::new(Arc::new(use_cases::sync::CloudSync::new(
            characters.clone(),
            backup,
            user_id,
            clock,
        )));

        Self {
            repositories: Repositories {
                characters,
                sessions,
                narrator,
                dice,
            },
            use_cases: UseCases {
                character,
                player_action,
                combat,
                inventory,
                progress,
                sync,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taleforge_domain::{AbilityOverrides, CharacterClass};

    use crate::infrastructure::memory::{InMemoryCharacterRepo, InMemoryGameStateRepo};
    use crate::test_fixtures::{FixedClock, RecordingNarrator, ScriptedRandom};
    use crate::use_cases::player_action::ActionOutcome;

    fn app(random: Arc<ScriptedRandom>) -> App {
        App::new(AppPorts {
            character_repo: Arc::new(InMemoryCharacterRepo::new()),
            game_state_repo: Arc::new(InMemoryGameStateRepo::new()),
            narrator: Arc::new(RecordingNarrator::replying("The road winds on.")),
            backup: None,
            clock: Arc::new(FixedClock::at_epoch()),
            random,
            user_id: "local".to_string(),
        })
    }

    #[tokio::test]
    async fn create_fight_and_win_through_the_app() {
        let random = Arc::new(ScriptedRandom::default());
        let app = app(random.clone());

        let hero = app
            .use_cases
            .character
            .create
            .execute("Brom", CharacterClass::Warrior, AbilityOverrides::default())
            .await
            .expect("create");

        let outcome = app
            .use_cases
            .player_action
            .process
            .execute(hero.id, "I walk to the gate")
            .await
            .expect("explore");
        assert_eq!(outcome.text(), "The road winds on.");

        app.use_cases
            .combat
            .start
            .execute(hero.id, "Rat", 0)
            .await
            .expect("start")
            .expect("hero exists");

        // Rat: 20 HP, AC 10. Warrior Str 13 (+1): 20 + 1 hits for 1 + 6 + 1 = 8.
        random.push([20, 6, 4, 20, 6, 4, 20, 6, 30]);
        for _ in 0..2 {
            let outcome = app
                .use_cases
                .player_action
                .process
                .execute(hero.id, "attack")
                .await
                .expect("round");
            assert!(matches!(outcome, ActionOutcome::Combat(_)));
        }
        let last = app
            .use_cases
            .player_action
            .process
            .execute(hero.id, "attack")
            .await
            .expect("round");
        assert!(last.text().contains("Victory! You gained 200 XP and 30 gold!"));
        assert_eq!(random.remaining(), 0);

        let stored = app
            .use_cases
            .character
            .manage
            .get(hero.id)
            .await
            .expect("get")
            .expect("stored");
        assert_eq!(stored.experience, 200);
        assert_eq!(stored.gold, 130);
    }
}
