//! Combat use cases: starting an encounter and resolving rounds.

mod resolve;
mod start;

use std::sync::Arc;

pub use resolve::{CombatRound, ResolveCombatRound, RoundOutcome};
pub use start::StartCombat;

use crate::infrastructure::ports::RepoError;

pub struct CombatUseCases {
    pub start: Arc<StartCombat>,
    pub resolve: Arc<ResolveCombatRound>,
}

impl CombatUseCases {
    pub fn new(start: Arc<StartCombat>, resolve: Arc<ResolveCombatRound>) -> Self {
        Self { start, resolve }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CombatError {
    #[error("No active combat")]
    NotInCombat,
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
