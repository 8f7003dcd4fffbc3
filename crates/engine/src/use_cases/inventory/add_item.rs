//! Add item use case.

use std::sync::Arc;

use taleforge_domain::{CharacterId, Item};

use super::{load, InventoryError};
use crate::repositories::CharacterStore;

pub struct AddItem {
    characters: Arc<CharacterStore>,
}

impl AddItem {
    pub fn new(characters: Arc<CharacterStore>) -> Self {
        Self { characters }
    }

    /// Append an item to the character's inventory.
    pub async fn execute(
        &self,
        character_id: CharacterId,
        item: Item,
    ) -> Result<(), InventoryError> {
        let mut character = load(&self.characters, character_id).await?;
        tracing::debug!(character_id = %character_id, item = %item.name, "Item added");
        character.inventory.push(item);
        self.characters.save(&mut character).await?;
        Ok(())
    }
}
