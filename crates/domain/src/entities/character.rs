//! Player character: stats, inventory, equipment and progress.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::{EquipmentSlot, Item};
use crate::error::DomainError;
use crate::ids::{CharacterId, ItemId};
use crate::rules::{self, BASE_ABILITY_SCORE};

/// Starting location of every new character.
pub const DEFAULT_LOCATION: &str = "Town Square";

/// Character classes. Each grants fixed additive ability bonuses at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
    Cleric,
    Ranger,
    Paladin,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 6] = [
        CharacterClass::Warrior,
        CharacterClass::Mage,
        CharacterClass::Rogue,
        CharacterClass::Cleric,
        CharacterClass::Ranger,
        CharacterClass::Paladin,
    ];

    /// Ability bonuses applied once, at creation.
    pub fn ability_bonuses(&self) -> [(Ability, i32); 2] {
        match self {
            CharacterClass::Warrior => [(Ability::Strength, 3), (Ability::Constitution, 2)],
            CharacterClass::Mage => [(Ability::Intelligence, 3), (Ability::Wisdom, 2)],
            CharacterClass::Rogue => [(Ability::Dexterity, 3), (Ability::Charisma, 2)],
            CharacterClass::Cleric => [(Ability::Wisdom, 3), (Ability::Constitution, 2)],
            CharacterClass::Ranger => [(Ability::Dexterity, 2), (Ability::Wisdom, 2)],
            CharacterClass::Paladin => [(Ability::Strength, 2), (Ability::Charisma, 2)],
        }
    }
}

impl std::fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Mage => "Mage",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Cleric => "Cleric",
            CharacterClass::Ranger => "Ranger",
            CharacterClass::Paladin => "Paladin",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for CharacterClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CharacterClass::ALL
            .into_iter()
            .find(|class| class.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::validation(format!("Unknown character class: {s}")))
    }
}

/// The six abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

/// Six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl AbilityScores {
    /// All six scores set to the same value.
    pub fn uniform(score: i32) -> Self {
        Self {
            strength: score,
            dexterity: score,
            constitution: score,
            intelligence: score,
            wisdom: score,
            charisma: score,
        }
    }

    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn get_mut(&mut self, ability: Ability) -> &mut i32 {
        match ability {
            Ability::Strength => &mut self.strength,
            Ability::Dexterity => &mut self.dexterity,
            Ability::Constitution => &mut self.constitution,
            Ability::Intelligence => &mut self.intelligence,
            Ability::Wisdom => &mut self.wisdom,
            Ability::Charisma => &mut self.charisma,
        }
    }

    /// Replace defaults with any supplied overrides.
    pub fn with_overrides(mut self, overrides: &AbilityOverrides) -> Self {
        for (ability, value) in overrides.iter() {
            *self.get_mut(ability) = value;
        }
        self
    }

    /// Add the class's fixed bonuses.
    pub fn with_class_bonuses(mut self, class: CharacterClass) -> Self {
        for (ability, bonus) in class.ability_bonuses() {
            *self.get_mut(ability) += bonus;
        }
        self
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::uniform(BASE_ABILITY_SCORE)
    }
}

/// Optional per-ability overrides supplied at character creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityOverrides {
    pub strength: Option<i32>,
    pub dexterity: Option<i32>,
    pub constitution: Option<i32>,
    pub intelligence: Option<i32>,
    pub wisdom: Option<i32>,
    pub charisma: Option<i32>,
}

impl AbilityOverrides {
    pub fn set(mut self, ability: Ability, value: i32) -> Self {
        let slot = match ability {
            Ability::Strength => &mut self.strength,
            Ability::Dexterity => &mut self.dexterity,
            Ability::Constitution => &mut self.constitution,
            Ability::Intelligence => &mut self.intelligence,
            Ability::Wisdom => &mut self.wisdom,
            Ability::Charisma => &mut self.charisma,
        };
        *slot = Some(value);
        self
    }

    fn iter(&self) -> impl Iterator<Item = (Ability, i32)> {
        [
            (Ability::Strength, self.strength),
            (Ability::Dexterity, self.dexterity),
            (Ability::Constitution, self.constitution),
            (Ability::Intelligence, self.intelligence),
            (Ability::Wisdom, self.wisdom),
            (Ability::Charisma, self.charisma),
        ]
        .into_iter()
        .filter_map(|(ability, value)| value.map(|v| (ability, v)))
    }
}

/// Result of a successful level-up check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub new_level: u32,
    pub hit_point_gain: i32,
}

/// Result of a defeat penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefeatPenalty {
    pub restored_hit_points: i32,
    pub gold_lost: u32,
}

/// A player character.
///
/// # Invariants
///
/// - `max_hit_points` is derived from Constitution and only changes at creation
///   and on level up.
/// - `0 <= hit_points <= max_hit_points` outside of combat resolution.
/// - `equipment` holds at most one item per slot (it is keyed by slot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    pub experience: u32,
    pub abilities: AbilityScores,
    pub hit_points: i32,
    pub max_hit_points: i32,
    pub armor_class: i32,
    pub gold: u32,
    pub inventory: Vec<Item>,
    pub equipment: BTreeMap<EquipmentSlot, Item>,
    pub current_location: String,
    pub completed_quests: BTreeSet<String>,
    pub active_quests: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub last_played_at: DateTime<Utc>,
    pub total_play_minutes: u32,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub is_synced: bool,
}

impl Character {
    /// Create a level 1 character.
    ///
    /// Overrides replace the default score of 10 before class bonuses apply;
    /// hit points and armor class are then derived from the final scores.
    pub fn create(
        name: impl Into<String>,
        class: CharacterClass,
        overrides: &AbilityOverrides,
        now: DateTime<Utc>,
    ) -> Self {
        let abilities = AbilityScores::default()
            .with_overrides(overrides)
            .with_class_bonuses(class);
        let max_hit_points = rules::max_hit_points_for(abilities.constitution);

        Self {
            id: CharacterId::new(),
            name: name.into(),
            class,
            level: 1,
            experience: 0,
            abilities,
            hit_points: max_hit_points,
            max_hit_points,
            armor_class: rules::base_armor_class_for(abilities.dexterity),
            gold: rules::STARTING_GOLD,
            inventory: Vec::new(),
            equipment: BTreeMap::new(),
            current_location: DEFAULT_LOCATION.to_string(),
            completed_quests: BTreeSet::new(),
            active_quests: BTreeSet::new(),
            created_at: now,
            last_played_at: now,
            total_play_minutes: 0,
            last_synced_at: None,
            is_synced: false,
        }
    }

    // =========================================================================
    // Progression
    // =========================================================================

    /// Check for a level up. Advances at most one level per call even if the
    /// remaining experience still exceeds the next threshold.
    pub fn check_level_up(&mut self) -> Option<LevelUp> {
        let needed = rules::xp_needed(self.level);
        if self.experience < needed {
            return None;
        }

        self.level += 1;
        self.experience -= needed;
        let gain = rules::level_up_hp_gain(self.abilities.constitution);
        self.max_hit_points += gain;
        self.hit_points = self.max_hit_points;

        Some(LevelUp {
            new_level: self.level,
            hit_point_gain: gain,
        })
    }

    pub fn award(&mut self, experience: u32, gold: u32) {
        self.experience = self.experience.saturating_add(experience);
        self.gold = self.gold.saturating_add(gold);
    }

    /// Apply the penalty for being defeated: half hit points, minus 50 gold.
    pub fn apply_defeat(&mut self) -> DefeatPenalty {
        let gold_lost = self.gold.min(rules::DEFEAT_GOLD_PENALTY);
        self.gold -= gold_lost;
        self.hit_points = self.max_hit_points / 2;
        DefeatPenalty {
            restored_hit_points: self.hit_points,
            gold_lost,
        }
    }

    pub fn is_down(&self) -> bool {
        self.hit_points <= 0
    }

    // =========================================================================
    // Equipment
    // =========================================================================

    /// Ability score including bonuses from equipped items.
    pub fn effective_ability(&self, ability: Ability) -> i32 {
        self.abilities.get(ability)
            + self
                .equipment
                .values()
                .map(|item| item.bonuses.ability(ability))
                .sum::<i32>()
    }

    /// Damage bonus of the equipped weapon, 0 when unarmed.
    pub fn weapon_damage_bonus(&self) -> i32 {
        self.equipment
            .get(&EquipmentSlot::Weapon)
            .map(|w| w.bonuses.damage)
            .unwrap_or(0)
    }

    /// Recompute armor class from Dexterity and equipped armor bonuses.
    pub fn recalculate_armor_class(&mut self) {
        let armor: i32 = self.equipment.values().map(|item| item.bonuses.armor).sum();
        self.armor_class =
            rules::base_armor_class_for(self.effective_ability(Ability::Dexterity)) + armor;
    }

    /// Move an item from the inventory into its equipment slot.
    ///
    /// Returns the item previously in that slot, which goes back to the inventory.
    pub fn equip(&mut self, item_id: ItemId) -> Result<Option<Item>, DomainError> {
        let index = self
            .inventory
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| DomainError::not_found("Item", item_id))?;

        let item = &self.inventory[index];
        let slot = item.item_type.slot().ok_or_else(|| {
            DomainError::constraint(format!("{} cannot be equipped", item.name))
        })?;
        if item.required_level > self.level {
            return Err(DomainError::constraint(format!(
                "{} requires level {}",
                item.name, item.required_level
            )));
        }
        if !item.allowed_classes.is_empty() && !item.allowed_classes.contains(&self.class) {
            return Err(DomainError::constraint(format!(
                "{} cannot be used by a {}",
                item.name, self.class
            )));
        }

        let item = self.inventory.remove(index);
        let previous = self.equipment.insert(slot, item);
        if let Some(previous) = &previous {
            self.inventory.push(previous.clone());
        }
        self.recalculate_armor_class();
        Ok(previous)
    }

    /// Move the item in `slot` back to the inventory.
    pub fn unequip(&mut self, slot: EquipmentSlot) -> Result<Item, DomainError> {
        let item = self
            .equipment
            .remove(&slot)
            .ok_or_else(|| DomainError::not_found("EquippedItem", format!("{slot:?}")))?;
        self.inventory.push(item.clone());
        self.recalculate_armor_class();
        Ok(item)
    }

    /// Consume an item from the inventory. Returns the hit points restored.
    pub fn consume(&mut self, item_id: ItemId) -> Result<i32, DomainError> {
        let index = self
            .inventory
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| DomainError::not_found("Item", item_id))?;
        if !self.inventory[index].is_consumable {
            return Err(DomainError::constraint(format!(
                "{} is not consumable",
                self.inventory[index].name
            )));
        }

        let item = self.inventory.remove(index);
        let before = self.hit_points;
        self.hit_points = (self.hit_points + item.heal_amount).min(self.max_hit_points);
        Ok(self.hit_points - before)
    }

    // =========================================================================
    // Quests
    // =========================================================================

    pub fn start_quest(&mut self, quest_id: impl Into<String>) -> bool {
        self.active_quests.insert(quest_id.into())
    }

    pub fn complete_quest(&mut self, quest_id: &str) -> Result<(), DomainError> {
        if !self.active_quests.remove(quest_id) {
            return Err(DomainError::constraint(format!(
                "Quest {quest_id} is not active"
            )));
        }
        self.completed_quests.insert(quest_id.to_string());
        Ok(())
    }
}
