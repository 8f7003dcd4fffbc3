//! Inventory operation errors.

use crate::infrastructure::ports::RepoError;
use taleforge_domain::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Character not found")]
    CharacterNotFound,
    #[error("{0}")]
    Rule(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
