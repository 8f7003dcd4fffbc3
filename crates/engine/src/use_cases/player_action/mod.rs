//! Player action dispatch: combat round or free-form narration.

use std::sync::Arc;

use taleforge_domain::{CharacterId, MessageRole};

use crate::infrastructure::ports::RepoError;
use crate::repositories::{CharacterStore, NarratorService, SessionStore};
use crate::use_cases::combat::{CombatError, CombatRound, ResolveCombatRound};

pub struct PlayerActionUseCases {
    pub process: Arc<ProcessPlayerAction>,
}

impl PlayerActionUseCases {
    pub fn new(process: Arc<ProcessPlayerAction>) -> Self {
        Self { process }
    }
}

/// What a player action produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    CharacterNotFound,
    Narrated(String),
    Combat(CombatRound),
}

impl ActionOutcome {
    /// Text to show the player.
    pub fn text(&self) -> &str {
        match self {
            ActionOutcome::CharacterNotFound => "Character not found.",
            ActionOutcome::Narrated(text) => text,
            ActionOutcome::Combat(round) => &round.text,
        }
    }
}

pub struct ProcessPlayerAction {
    characters: Arc<CharacterStore>,
    sessions: Arc<SessionStore>,
    narrator: Arc<NarratorService>,
    resolve_round: Arc<ResolveCombatRound>,
}

impl ProcessPlayerAction {
    pub fn new(
        characters: Arc<CharacterStore>,
        sessions: Arc<SessionStore>,
        narrator: Arc<NarratorService>,
        resolve_round: Arc<ResolveCombatRound>,
    ) -> Self {
        Self {
            characters,
            sessions,
            narrator,
            resolve_round,
        }
    }

    /// Record the action in the session history, then either resolve a combat
    /// round or ask the narrator what happens.
    ///
    /// Nothing is persisted until narration has returned, so a slow or failing
    /// narrator leaves stored state untouched.
    pub async fn execute(
        &self,
        character_id: CharacterId,
        action: &str,
    ) -> Result<ActionOutcome, ActionError> {
        let Some(mut character) = self.characters.get(character_id).await? else {
            tracing::debug!(character_id = %character_id, "Action for unknown character");
            return Ok(ActionOutcome::CharacterNotFound);
        };

        let mut session = self.sessions.get_or_create(character_id).await?;
        session.push_message(MessageRole::User, action, self.sessions.now());

        if session.in_combat() {
            let round = self
                .resolve_round
                .resolve(&mut character, &mut session, action)
                .await?;
            return Ok(ActionOutcome::Combat(round));
        }

        let narrative = self.narrator.narrate(&character, &session, action).await;
        session.push_message(MessageRole::Assistant, narrative.clone(), self.sessions.now());
        session.current_narrative = narrative.clone();

        self.characters.save(&mut character).await?;
        self.sessions.save(&mut session).await?;

        tracing::debug!(
            character_id = %character_id,
            history = session.conversation_history.len(),
            "Action narrated"
        );
        Ok(ActionOutcome::Narrated(narrative))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
    #[error("Combat error: {0}")]
    Combat(#[from] CombatError),
}
