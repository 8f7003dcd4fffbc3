//! Inventory use case results.

/// Result of moving an item between inventory and equipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentChange {
    pub item_name: String,
    /// Item that was pushed back to the inventory, if a slot was occupied.
    pub replaced: Option<String>,
    pub armor_class: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUsed {
    pub item_name: String,
    pub healed: i32,
    pub hit_points: i32,
}
