//! Repository modules - Data access wrappers around port traits.
//!
//! Each wrapper owns a port and adds the behavior the engine expects on top
//! of plain storage: timestamps, lazy session creation, history trimming,
//! narration fallbacks and dice.

pub mod character;
pub mod game_state;
pub mod narrator;
pub mod random;

pub use character::CharacterStore;
pub use game_state::SessionStore;
pub use narrator::{NarratorService, FALLBACK_NARRATIVE};
pub use random::Dice;
