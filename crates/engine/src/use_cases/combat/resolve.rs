//! Combat round resolution.
//!
//! A round is resolved entirely from dice rolls and character stats. Narration
//! is requested afterwards as flavor and never feeds back into the mechanics.

use std::sync::Arc;

use taleforge_domain::rules::{self, XP_PER_ENEMY_HP};
use taleforge_domain::{
    ability_modifier, Ability, Character, Combat, DefeatPenalty, GameState, LevelUp,
};

use super::CombatError;
use crate::repositories::{CharacterStore, Dice, NarratorService, SessionStore};

const ATTACK_WORDS: [&str; 2] = ["attack", "fight"];
const FLEE_WORDS: [&str; 2] = ["flee", "run"];

/// Gold reward bounds for a victory, inclusive.
const VICTORY_GOLD: (i32, i32) = (10, 50);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    Fled,
    Victory {
        experience: u32,
        gold: u32,
        level_up: Option<LevelUp>,
    },
    Defeat(DefeatPenalty),
    Continues,
}

impl RoundOutcome {
    /// Whether the encounter is over after this round.
    pub fn ends_combat(&self) -> bool {
        !matches!(self, RoundOutcome::Continues)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatRound {
    pub outcome: RoundOutcome,
    pub text: String,
}

pub struct ResolveCombatRound {
    characters: Arc<CharacterStore>,
    sessions: Arc<SessionStore>,
    dice: Arc<Dice>,
    narrator: Arc<NarratorService>,
}

impl ResolveCombatRound {
    pub fn new(
        characters: Arc<CharacterStore>,
        sessions: Arc<SessionStore>,
        dice: Arc<Dice>,
        narrator: Arc<NarratorService>,
    ) -> Self {
        Self {
            characters,
            sessions,
            dice,
            narrator,
        }
    }

    /// Resolve one round of the session's active combat and persist the result.
    ///
    /// Roll order is fixed: player d20 then d6 on an attack, gold on victory,
    /// enemy d20 otherwise. A flee persists only the session.
    pub async fn resolve(
        &self,
        character: &mut Character,
        session: &mut GameState,
        action: &str,
    ) -> Result<CombatRound, CombatError> {
        let mut combat = session.active_combat.take().ok_or(CombatError::NotInCombat)?;
        let action_lower = action.to_lowercase();
        let mut lines = Vec::new();

        if mentions_any(&action_lower, &ATTACK_WORDS) {
            lines.push(self.player_attack(character, &mut combat));
        } else if mentions_any(&action_lower, &FLEE_WORDS) {
            self.sessions.save(session).await?;
            tracing::info!(
                character_id = %character.id,
                enemy = %combat.enemy_name,
                round = combat.round,
                "Fled from combat"
            );
            return Ok(CombatRound {
                outcome: RoundOutcome::Fled,
                text: "You flee from combat!".to_string(),
            });
        }

        let outcome = if combat.is_enemy_defeated() {
            self.victory(character, &combat, &mut lines)
        } else {
            self.enemy_turn(character, &combat, &mut lines)
        };

        let mut text = lines.join("\n");
        if let Some(flavor) = self.narrator.combat_flavor(character, &combat, action).await {
            text.push_str("\n\n");
            text.push_str(&flavor);
        }

        if !outcome.ends_combat() {
            combat.round += 1;
            session.active_combat = Some(combat);
        }

        self.characters.save(character).await?;
        self.sessions.save(session).await?;

        Ok(CombatRound { outcome, text })
    }

    fn player_attack(&self, character: &Character, combat: &mut Combat) -> String {
        let roll = self.dice.d20();
        let d6 = self.dice.d6();
        let modifier = ability_modifier(character.effective_ability(Ability::Strength));
        let damage = rules::attack_damage(d6, modifier, character.weapon_damage_bonus());
        let hit = rules::attack_hits(roll, modifier, combat.enemy_armor_class);

        tracing::debug!(
            character_id = %character.id,
            round = combat.round,
            roll,
            modifier,
            damage,
            hit,
            "Player attack"
        );

        if hit {
            combat.enemy_hit_points -= damage;
            format!("You hit for {damage} damage!")
        } else {
            "Your attack misses!".to_string()
        }
    }

    fn victory(
        &self,
        character: &mut Character,
        combat: &Combat,
        lines: &mut Vec<String>,
    ) -> RoundOutcome {
        let experience =
            u32::try_from(combat.enemy_max_hit_points).unwrap_or(0).saturating_mul(XP_PER_ENEMY_HP);
        let gold = u32::try_from(self.dice.range(VICTORY_GOLD.0, VICTORY_GOLD.1)).unwrap_or(0);

        character.award(experience, gold);
        lines.push(format!("Victory! You gained {experience} XP and {gold} gold!"));

        let level_up = character.check_level_up();
        if let Some(level_up) = level_up {
            lines.push(format!(
                "Level up! You are now level {} (+{} max HP).",
                level_up.new_level, level_up.hit_point_gain
            ));
            tracing::info!(character_id = %character.id, level = level_up.new_level, "Level up");
        }

        tracing::info!(
            character_id = %character.id,
            enemy = %combat.enemy_name,
            experience,
            gold,
            "Combat won"
        );
        RoundOutcome::Victory {
            experience,
            gold,
            level_up,
        }
    }

    fn enemy_turn(
        &self,
        character: &mut Character,
        combat: &Combat,
        lines: &mut Vec<String>,
    ) -> RoundOutcome {
        let roll = self.dice.d20();
        tracing::debug!(
            character_id = %character.id,
            round = combat.round,
            roll,
            armor_class = character.armor_class,
            "Enemy attack"
        );

        if roll < character.armor_class {
            lines.push(format!("The {} misses!", combat.enemy_name));
            return RoundOutcome::Continues;
        }

        character.hit_points -= combat.enemy_damage;
        lines.push(format!(
            "The {} hits you for {} damage!",
            combat.enemy_name, combat.enemy_damage
        ));
        if !character.is_down() {
            return RoundOutcome::Continues;
        }

        let penalty = character.apply_defeat();
        lines.push("You have been defeated!".to_string());
        lines.push(format!(
            "You come to with {} HP, {} gold lighter.",
            penalty.restored_hit_points, penalty.gold_lost
        ));
        tracing::info!(
            character_id = %character.id,
            enemy = %combat.enemy_name,
            gold_lost = penalty.gold_lost,
            "Combat lost"
        );
        RoundOutcome::Defeat(penalty)
    }
}

fn mentions_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|word| text.contains(word))
}
