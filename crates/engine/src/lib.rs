//! Taleforge Engine library.
//!
//! Session and combat engine for a narrated role-playing game.
//!
//! ## Structure
//!
//! - `repositories/` - Character and Session stores over the storage ports
//! - `use_cases/` - Player-facing operations across the stores
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod repositories;
pub mod use_cases;

/// Shared test doubles.
#[cfg(test)]
pub mod test_fixtures;

pub use app::{App, AppPorts};
