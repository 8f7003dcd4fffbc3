//! Progression and combat arithmetic.
//!
//! Everything here is pure: dice results are passed in by the caller, so the
//! same inputs always produce the same outputs.

use serde::{Deserialize, Serialize};

/// Score every ability starts at before overrides and class bonuses.
pub const BASE_ABILITY_SCORE: i32 = 10;

/// Hit points of a character with an average (10) Constitution.
pub const BASE_HIT_POINTS: i32 = 20;

/// Armor class of an unarmored character with an average (10) Dexterity.
pub const BASE_ARMOR_CLASS: i32 = 10;

/// Experience required per level: reaching level `n + 1` costs `n * 1000`.
pub const XP_PER_LEVEL: u32 = 1000;

/// Flat hit point gain on level up, before the Constitution modifier.
pub const LEVEL_UP_HP_BONUS: i32 = 5;

/// Gold a new character starts with.
pub const STARTING_GOLD: u32 = 100;

/// Gold lost when a character is defeated.
pub const DEFEAT_GOLD_PENALTY: u32 = 50;

/// Experience awarded per point of enemy max hit points.
pub const XP_PER_ENEMY_HP: u32 = 10;

/// Standard ability-score modifier: `floor((score - 10) / 2)`.
///
/// Rounds toward negative infinity, so a score of 9 yields -1, not 0.
pub fn ability_modifier(score: i32) -> i32 {
    (score - BASE_ABILITY_SCORE).div_euclid(2)
}

/// Max hit points derived from Constitution.
pub fn max_hit_points_for(constitution: i32) -> i32 {
    BASE_HIT_POINTS + (constitution - BASE_ABILITY_SCORE)
}

/// Armor class derived from Dexterity, before any armor bonuses.
pub fn base_armor_class_for(dexterity: i32) -> i32 {
    BASE_ARMOR_CLASS + ability_modifier(dexterity)
}

/// Experience needed to advance past `level`.
pub fn xp_needed(level: u32) -> u32 {
    level.saturating_mul(XP_PER_LEVEL)
}

/// Hit points gained when leveling up with the given Constitution.
pub fn level_up_hp_gain(constitution: i32) -> i32 {
    LEVEL_UP_HP_BONUS + ability_modifier(constitution)
}

/// Damage of a landed player attack: `max(1, 1 + d6 + modifier + weapon bonus)`.
pub fn attack_damage(d6: i32, strength_modifier: i32, weapon_bonus: i32) -> i32 {
    (1 + d6 + strength_modifier + weapon_bonus).max(1)
}

/// Whether a d20 attack roll plus modifier meets the target armor class.
pub fn attack_hits(roll: i32, modifier: i32, armor_class: i32) -> bool {
    roll + modifier >= armor_class
}

/// Stats of an enemy, derived entirely from its level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub hit_points: i32,
    pub armor_class: i32,
    pub damage: i32,
}

impl EnemyStats {
    pub fn for_level(level: i32) -> Self {
        Self {
            hit_points: 20 + level * 10,
            armor_class: 10 + level,
            damage: 5 + level * 2,
        }
    }
}
