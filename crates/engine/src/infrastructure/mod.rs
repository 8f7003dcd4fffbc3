//! Infrastructure layer - external dependency implementations.
//!
//! - `ports` - Trait definitions at the engine's boundaries
//! - `memory`, `sqlite` - Character and session document stores
//! - `ollama`, `resilient_llm`, `narrator` - LLM client stack and narration
//! - `backup` - Cloud backup and leaderboard client
//! - `clock` - System clock and random source
//! - `config` - Environment configuration

pub mod backup;
pub mod clock;
pub mod config;
pub mod memory;
pub mod narrator;
pub mod ollama;
pub mod ports;
pub mod resilient_llm;
pub mod sqlite;
