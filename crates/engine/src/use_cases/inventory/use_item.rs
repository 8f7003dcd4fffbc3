//! Use (consume) item use case.

use std::sync::Arc;

use taleforge_domain::{CharacterId, ItemId};

use super::{load, InventoryError, ItemUsed};
use crate::repositories::CharacterStore;

pub struct UseItem {
    characters: Arc<CharacterStore>,
}

impl UseItem {
    pub fn new(characters: Arc<CharacterStore>) -> Self {
        Self { characters }
    }

    /// Consume an item, healing up to max hit points.
    pub async fn execute(
        &self,
        character_id: CharacterId,
        item_id: ItemId,
    ) -> Result<ItemUsed, InventoryError> {
        let mut character = load(&self.characters, character_id).await?;
        let item_name = character
            .inventory
            .iter()
            .find(|item| item.id == item_id)
            .map(|item| item.name.clone())
            .unwrap_or_default();
        let healed = character.consume(item_id)?;
        self.characters.save(&mut character).await?;

        tracing::debug!(character_id = %character_id, item = %item_name, healed, "Item used");
        Ok(ItemUsed {
            item_name,
            healed,
            hit_points: character.hit_points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taleforge_domain::{Character, CharacterClass, Item, ItemType};

    use crate::test_fixtures::{Harness, RecordingNarrator};

    #[tokio::test]
    async fn potion_heals_up_to_max_and_is_consumed() {
        let h = Harness::new(RecordingNarrator::replying("..."));
        let mut c = Character::create("Ila", CharacterClass::Mage, &Default::default(), h.clock.0);
        c.hit_points = 15;
        let potion = Item::new("Healing Potion", ItemType::Potion).consumable(10);
        let potion_id = potion.id;
        c.inventory.push(potion);
        let c = h.seed(c).await;

        let used = UseItem::new(h.characters.clone())
            .execute(c.id, potion_id)
            .await
            .expect("use");

        assert_eq!(
            used,
            ItemUsed {
                item_name: "Healing Potion".to_string(),
                healed: 5,
                hit_points: 20
            }
        );
        let stored = h.characters.get(c.id).await.expect("get").expect("stored");
        assert!(stored.inventory.is_empty());
    }

    #[tokio::test]
    async fn non_consumables_are_rejected() {
        let h = Harness::new(RecordingNarrator::replying("..."));
        let mut c = Character::create("Ila", CharacterClass::Mage, &Default::default(), h.clock.0);
        let rock = Item::new("Rock", ItemType::Misc);
        let rock_id = rock.id;
        c.inventory.push(rock);
        let c = h.seed(c).await;

        let result = UseItem::new(h.characters.clone()).execute(c.id, rock_id).await;
        assert!(matches!(result, Err(InventoryError::Rule(_))));
    }
}
