//! Use cases - player-facing operations.
//!
//! Each module groups the use cases of one area. Use cases orchestrate the
//! stores and the narrator; game rules live on the domain types.

pub mod character;
pub mod combat;
pub mod inventory;
pub mod player_action;
pub mod progress;
pub mod sync;

pub use character::CharacterUseCases;
pub use combat::CombatUseCases;
pub use inventory::InventoryUseCases;
pub use player_action::PlayerActionUseCases;
pub use progress::ProgressUseCases;
pub use sync::SyncUseCases;
