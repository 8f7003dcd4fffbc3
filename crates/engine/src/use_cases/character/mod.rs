//! Character lifecycle use cases.

mod create;
mod introduce;
mod manage;

use std::sync::Arc;

pub use create::CreateCharacter;
pub use introduce::IntroduceCharacter;
pub use manage::ManageCharacters;

use crate::infrastructure::ports::RepoError;

pub struct CharacterUseCases {
    pub create: Arc<CreateCharacter>,
    pub introduce: Arc<IntroduceCharacter>,
    pub manage: Arc<ManageCharacters>,
}

impl CharacterUseCases {
    pub fn new(
        create: Arc<CreateCharacter>,
        introduce: Arc<IntroduceCharacter>,
        manage: Arc<ManageCharacters>,
    ) -> Self {
        Self {
            create,
            introduce,
            manage,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CharacterError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
