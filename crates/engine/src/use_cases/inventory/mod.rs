//! Inventory use cases.
//!
//! Every operation loads the character, applies the change through the
//! character's own rules and saves it back.

mod add_item;
mod equip_item;
mod error;
mod types;
mod unequip_item;
mod use_item;

use std::sync::Arc;

use taleforge_domain::{Character, CharacterId};

pub use add_item::AddItem;
pub use equip_item::EquipItem;
pub use error::InventoryError;
pub use types::{EquipmentChange, ItemUsed};
pub use unequip_item::UnequipItem;
pub use use_item::UseItem;

use crate::repositories::CharacterStore;

/// Container for inventory use cases.
pub struct InventoryUseCases {
    pub add: Arc<AddItem>,
    pub equip: Arc<EquipItem>,
    pub unequip: Arc<UnequipItem>,
    pub use_item: Arc<UseItem>,
}

impl InventoryUseCases {
    pub fn new(
        add: Arc<AddItem>,
        equip: Arc<EquipItem>,
        unequip: Arc<UnequipItem>,
        use_item: Arc<UseItem>,
    ) -> Self {
        Self {
            add,
            equip,
            unequip,
            use_item,
        }
    }
}

async fn load(characters: &CharacterStore, id: CharacterId) -> Result<Character, InventoryError> {
    characters
        .get(id)
        .await?
        .ok_or(InventoryError::CharacterNotFound)
}
