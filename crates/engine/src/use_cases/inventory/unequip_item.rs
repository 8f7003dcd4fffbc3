//! Unequip item use case.

use std::sync::Arc;

use taleforge_domain::{CharacterId, EquipmentSlot};

use super::{load, EquipmentChange, InventoryError};
use crate::repositories::CharacterStore;

pub struct UnequipItem {
    characters: Arc<CharacterStore>,
}

impl UnequipItem {
    pub fn new(characters: Arc<CharacterStore>) -> Self {
        Self { characters }
    }

    pub async fn execute(
        &self,
        character_id: CharacterId,
        slot: EquipmentSlot,
    ) -> Result<EquipmentChange, InventoryError> {
        let mut character = load(&self.characters, character_id).await?;
        let item = character.unequip(slot)?;
        self.characters.save(&mut character).await?;

        tracing::info!(character_id = %character_id, item = %item.name, ?slot, "Item unequipped");
        Ok(EquipmentChange {
            item_name: item.name,
            replaced: None,
            armor_class: character.armor_class,
        })
    }
}
