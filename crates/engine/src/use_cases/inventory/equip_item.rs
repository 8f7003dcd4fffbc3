//! Equip item use case.

use std::sync::Arc;

use taleforge_domain::{CharacterId, ItemId};

use super::{load, EquipmentChange, InventoryError};
use crate::repositories::CharacterStore;

pub struct EquipItem {
    characters: Arc<CharacterStore>,
}

impl EquipItem {
    pub fn new(characters: Arc<CharacterStore>) -> Self {
        Self { characters }
    }

    /// Move an inventory item into its slot.
    ///
    /// Fails when the item is not in the inventory, has no slot, needs a higher
    /// level or is restricted to other classes.
    pub async fn execute(
        &self,
        character_id: CharacterId,
        item_id: ItemId,
    ) -> Result<EquipmentChange, InventoryError> {
        let mut character = load(&self.characters, character_id).await?;
        let replaced = character.equip(item_id)?;
        let item_name = character
            .equipment
            .values()
            .find(|item| item.id == item_id)
            .map(|item| item.name.clone())
            .unwrap_or_default();

        self.characters.save(&mut character).await?;

        tracing::info!(
            character_id = %character_id,
            item = %item_name,
            armor_class = character.armor_class,
            "Item equipped"
        );
        Ok(EquipmentChange {
            item_name,
            replaced: replaced.map(|item| item.name),
            armor_class: character.armor_class,
        })
    }
}
