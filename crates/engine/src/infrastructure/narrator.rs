//! LLM-backed narrator.
//!
//! Builds prompts from the character, session and action, and turns the model's
//! reply into narration. Empty replies count as invalid responses.

use std::sync::Arc;

use async_trait::async_trait;
use taleforge_domain::{Character, Combat, GameState, MessageRole};

use crate::infrastructure::ports::{
    ChatMessage, LlmError, LlmPort, LlmRequest, NarratorError, NarratorPort,
};

/// Conversation messages replayed to the model for context.
pub const NARRATIVE_CONTEXT_MESSAGES: usize = 10;

const NARRATOR_PERSONA: &str = "You are the narrator of a fantasy role-playing game. \
Describe what happens in response to the player's action in second person, in two to four \
vivid sentences. Never decide dice outcomes, hit points, gold or experience yourself.";

#[derive(Debug, Clone)]
pub struct NarratorConfig {
    pub temperature: f32,
    pub narrative_max_tokens: u32,
    pub combat_max_tokens: u32,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            narrative_max_tokens: 400,
            combat_max_tokens: 150,
        }
    }
}

pub struct LlmNarrator {
    llm: Arc<dyn LlmPort>,
    config: NarratorConfig,
}

impl LlmNarrator {
    pub fn new(llm: Arc<dyn LlmPort>, config: NarratorConfig) -> Self {
        Self { llm, config }
    }

    async fn complete(&self, request: LlmRequest) -> Result<String, NarratorError> {
        let response = self.llm.generate(request).await?;
        let text = response.content.trim();
        if text.is_empty() {
            return Err(LlmError::InvalidResponse("empty narration".to_string()).into());
        }
        Ok(text.to_string())
    }
}

fn character_sheet(character: &Character) -> String {
    format!(
        "{name}, a level {level} {class}. HP {hp}/{max_hp}, AC {ac}, {gold} gold. \
         Currently in {location}.",
        name = character.name,
        level = character.level,
        class = character.class,
        hp = character.hit_points,
        max_hp = character.max_hit_points,
        ac = character.armor_class,
        gold = character.gold,
        location = character.current_location,
    )
}

pub(crate) fn narrative_request(
    character: &Character,
    session: &GameState,
    action: &str,
    config: &NarratorConfig,
) -> LlmRequest {
    let system = format!(
        "{NARRATOR_PERSONA}\n\nThe player character: {}\nScene: {}\nSo far: {}",
        character_sheet(character),
        session.current_scene,
        session.current_narrative,
    );

    let mut messages: Vec<ChatMessage> = session
        .recent_messages(NARRATIVE_CONTEXT_MESSAGES)
        .iter()
        .map(|m| match m.role {
            MessageRole::User => ChatMessage::user(m.content.clone()),
            MessageRole::Assistant => ChatMessage::assistant(m.content.clone()),
        })
        .collect();

    // The action is usually already the last history entry.
    let already_recorded = messages
        .last()
        .is_some_and(|m| m == &ChatMessage::user(action));
    if !already_recorded {
        messages.push(ChatMessage::user(action));
    }

    LlmRequest::new(messages)
        .with_system_prompt(system)
        .with_temperature(config.temperature)
        .with_max_tokens(Some(config.narrative_max_tokens))
}

fn combat_request(
    character: &Character,
    combat: &Combat,
    action: &str,
    config: &NarratorConfig,
) -> LlmRequest {
    let system = format!(
        "{NARRATOR_PERSONA}\n\nYou are narrating round {round} of a fight between {sheet} and a \
         {enemy} ({enemy_hp}/{enemy_max} HP). Write one short paragraph of flavor only.",
        round = combat.round,
        sheet = character_sheet(character),
        enemy = combat.enemy_name,
        enemy_hp = combat.enemy_hit_points.max(0),
        enemy_max = combat.enemy_max_hit_points,
    );

    LlmRequest::new(vec![ChatMessage::user(action)])
        .with_system_prompt(system)
        .with_temperature(config.temperature)
        .with_max_tokens(Some(config.combat_max_tokens))
}

#[async_trait]
impl NarratorPort for LlmNarrator {
    async fn generate_narrative(
        &self,
        character: &Character,
        session: &GameState,
        action: &str,
    ) -> Result<String, NarratorError> {
        self.complete(narrative_request(character, session, action, &self.config))
            .await
    }

    async fn generate_combat_narrative(
        &self,
        character: &Character,
        combat: &Combat,
        action: &str,
    ) -> Result<String, NarratorError> {
        self.complete(combat_request(character, combat, action, &self.config))
            .await
    }

    async fn generate_introduction(&self, character: &Character) -> Result<String, NarratorError> {
        let system = format!(
            "{NARRATOR_PERSONA}\n\nIntroduce a new adventure for {}",
            character_sheet(character)
        );
        let request = LlmRequest::new(vec![ChatMessage::user("Begin the adventure.")])
            .with_system_prompt(system)
            .with_temperature(self.config.temperature)
            .with_max_tokens(Some(self.config.narrative_max_tokens));
        self.complete(request).await
    }

    async fn is_available(&self) -> bool {
        let ping = LlmRequest::new(vec![ChatMessage::user("ping")]).with_max_tokens(Some(1));
        match self.llm.generate(ping).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Narrator availability ping failed");
                false
            }
        }
    }
}
