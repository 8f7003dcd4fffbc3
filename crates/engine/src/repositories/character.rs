//! Character Store.

use std::sync::Arc;

use taleforge_domain::{Character, CharacterId};

use crate::infrastructure::ports::{CharacterRepo, ClockPort, RepoError};

/// Character persistence.
///
/// No validation beyond existence checks; callers keep character invariants.
pub struct CharacterStore {
    repo: Arc<dyn CharacterRepo>,
    clock: Arc<dyn ClockPort>,
}

impl CharacterStore {
    pub fn new(repo: Arc<dyn CharacterRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { repo, clock }
    }

    pub async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        self.repo.get(id).await
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Character>, RepoError> {
        self.repo.get_by_name(name).await
    }

    pub async fn get_all(&self) -> Result<Vec<Character>, RepoError> {
        self.repo.list().await
    }

    /// Upsert after play. Stamps `last_played_at` and marks the character as
    /// changed since its last cloud sync.
    pub async fn save(&self, character: &mut Character) -> Result<(), RepoError> {
        character.last_played_at = self.clock.now();
        character.is_synced = false;
        self.repo.save(character).await
    }

    /// Upsert after a successful cloud sync.
    pub async fn save_synced(&self, character: &mut Character) -> Result<(), RepoError> {
        character.last_synced_at = Some(self.clock.now());
        character.is_synced = true;
        self.repo.save(character).await
    }

    /// Upsert a character restored from a backup, as-is.
    pub async fn restore(&self, character: &Character) -> Result<(), RepoError> {
        self.repo.save(character).await
    }

    pub async fn delete(&self, id: CharacterId) -> Result<bool, RepoError> {
        self.repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use taleforge_domain::CharacterClass;

    use crate::infrastructure::ports::{MockCharacterRepo, MockClockPort};

    #[tokio::test]
    async fn save_stamps_last_played_and_clears_sync_flag() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut clock = MockClockPort::new();
        clock.expect_now().return_const(now);

        let mut repo = MockCharacterRepo::new();
        repo.expect_save()
            .withf(move |c| c.last_played_at == now && !c.is_synced)
            .times(1)
            .returning(|_| Ok(()));

        let store = CharacterStore::new(Arc::new(repo), Arc::new(clock));
        let mut c = Character::create("Ada", CharacterClass::Mage, &Default::default(), Utc::now());
        c.is_synced = true;
        store.save(&mut c).await.expect("save");
        assert_eq!(c.last_played_at, now);
    }

    #[tokio::test]
    async fn save_synced_records_sync_time() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut clock = MockClockPort::new();
        clock.expect_now().return_const(now);

        let mut repo = MockCharacterRepo::new();
        repo.expect_save()
            .withf(move |c| c.is_synced && c.last_synced_at == Some(now))
            .times(1)
            .returning(|_| Ok(()));

        let store = CharacterStore::new(Arc::new(repo), Arc::new(clock));
        let mut c = Character::create("Ada", CharacterClass::Mage, &Default::default(), Utc::now());
        store.save_synced(&mut c).await.expect("save");
    }
}
