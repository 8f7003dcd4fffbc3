//! Entity definitions.

mod character;
mod game_state;
mod item;

pub use character::{
    Ability, AbilityOverrides, AbilityScores, Character, CharacterClass, DefeatPenalty, LevelUp,
    DEFAULT_LOCATION,
};
pub use game_state::{
    Combat, ConversationMessage, GameState, MessageRole, DEFAULT_NARRATIVE,
    MAX_CONVERSATION_HISTORY,
};
pub use item::{EquipmentSlot, Item, ItemBonuses, ItemType};
