//! Items, item types and equipment slots.

use serde::{Deserialize, Serialize};

use super::character::{Ability, CharacterClass};
use crate::ids::ItemId;

/// Equipment slots. A character holds at most one item per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Shield,
    Helmet,
    Boots,
    Ring,
    Amulet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Weapon,
    Armor,
    Shield,
    Helmet,
    Boots,
    Ring,
    Amulet,
    Potion,
    Scroll,
    QuestItem,
    Misc,
}

impl ItemType {
    /// Slot this item type occupies when equipped, if any.
    pub fn slot(&self) -> Option<EquipmentSlot> {
        match self {
            ItemType::Weapon => Some(EquipmentSlot::Weapon),
            ItemType::Armor => Some(EquipmentSlot::Armor),
            ItemType::Shield => Some(EquipmentSlot::Shield),
            ItemType::Helmet => Some(EquipmentSlot::Helmet),
            ItemType::Boots => Some(EquipmentSlot::Boots),
            ItemType::Ring => Some(EquipmentSlot::Ring),
            ItemType::Amulet => Some(EquipmentSlot::Amulet),
            ItemType::Potion | ItemType::Scroll | ItemType::QuestItem | ItemType::Misc => None,
        }
    }
}

/// Bonuses an item grants while equipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemBonuses {
    pub damage: i32,
    pub armor: i32,
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl ItemBonuses {
    pub fn ability(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }
}

/// An item. Immutable once created; replace it to change it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub item_type: ItemType,
    pub value: u32,
    pub bonuses: ItemBonuses,
    pub is_consumable: bool,
    pub heal_amount: i32,
    pub required_level: u32,
    /// Classes allowed to equip the item. Empty means any class.
    pub allowed_classes: Vec<CharacterClass>,
}

impl Item {
    pub fn new(name: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            description: String::new(),
            item_type,
            value: 0,
            bonuses: ItemBonuses::default(),
            is_consumable: false,
            heal_amount: 0,
            required_level: 1,
            allowed_classes: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    pub fn with_bonuses(mut self, bonuses: ItemBonuses) -> Self {
        self.bonuses = bonuses;
        self
    }

    pub fn consumable(mut self, heal_amount: i32) -> Self {
        self.is_consumable = true;
        self.heal_amount = heal_amount;
        self
    }

    pub fn requires_level(mut self, level: u32) -> Self {
        self.required_level = level;
        self
    }

    pub fn for_classes(mut self, classes: Vec<CharacterClass>) -> Self {
        self.allowed_classes = classes;
        self
    }
}
