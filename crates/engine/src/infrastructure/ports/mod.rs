//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Document storage (in-memory, SQLite)
//! - LLM calls and narration (could swap Ollama -> other providers)
//! - Cloud backup and leaderboard
//! - Clock/Random (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{CharacterRepo, GameStateRepo};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{
    BackupPort, ChatMessage, ChatRole, FinishReason, LlmPort, LlmRequest, LlmResponse,
    NarratorPort, TokenUsage,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::{MockBackupPort, MockLlmPort, MockNarratorPort};
#[cfg(test)]
pub use repos::{MockCharacterRepo, MockGameStateRepo};
#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{BackupError, LlmError, NarratorError, RepoError};
