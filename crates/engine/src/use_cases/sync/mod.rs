//! Cloud sync: character backup, restore and the shared leaderboard.

use std::sync::Arc;

use taleforge_domain::{
    clamp_leaderboard_limit, rank_leaderboard, BackupSummary, Character, CharacterId,
    CharacterSnapshot, LeaderboardEntry,
};

use crate::infrastructure::ports::{BackupError, BackupPort, ClockPort, RepoError};
use crate::repositories::CharacterStore;

pub struct SyncUseCases {
    pub cloud: Arc<CloudSync>,
}

impl SyncUseCases {
    pub fn new(cloud: Arc<CloudSync>) -> Self {
        Self { cloud }
    }
}

/// Mirrors characters to the backup service. Every operation fails with
/// [`SyncError::Disabled`] when no backup service is configured.
pub struct CloudSync {
    characters: Arc<CharacterStore>,
    backup: Option<Arc<dyn BackupPort>>,
    user_id: String,
    clock: Arc<dyn ClockPort>,
}

impl CloudSync {
    pub fn new(
        characters: Arc<CharacterStore>,
        backup: Option<Arc<dyn BackupPort>>,
        user_id: impl Into<String>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            characters,
            backup,
            user_id: user_id.into(),
            clock,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backup.is_some()
    }

    fn backup(&self) -> Result<&Arc<dyn BackupPort>, SyncError> {
        self.backup.as_ref().ok_or(SyncError::Disabled)
    }

    /// Back up the character, submit its score and mark it synced.
    pub async fn sync_character(&self, character_id: CharacterId) -> Result<Character, SyncError> {
        let backup = self.backup()?;
        let mut character = self
            .characters
            .get(character_id)
            .await?
            .ok_or(SyncError::CharacterNotFound)?;

        let snapshot = CharacterSnapshot::of(self.user_id.as_str(), &character, self.clock.now());
        backup.backup(&snapshot).await?;
        backup.submit_score(&LeaderboardEntry::from(&character)).await?;
        self.characters.save_synced(&mut character).await?;

        tracing::info!(
            character_id = %character_id,
            user_id = %self.user_id,
            level = character.level,
            "Character synced"
        );
        Ok(character)
    }

    /// Fetch the latest backup of `name` and upsert it locally.
    pub async fn restore_character(&self, name: &str) -> Result<Option<Character>, SyncError> {
        let backup = self.backup()?;
        let Some(snapshot) = backup.restore(&self.user_id, name).await? else {
            tracing::debug!(user_id = %self.user_id, name, "No backup to restore");
            return Ok(None);
        };

        self.characters.restore(&snapshot.character).await?;
        tracing::info!(
            character_id = %snapshot.character.id,
            taken_at = %snapshot.taken_at,
            "Character restored from backup"
        );
        Ok(Some(snapshot.character))
    }

    /// Backups held for this user, most recent first.
    pub async fn list_backups(&self) -> Result<Vec<BackupSummary>, SyncError> {
        Ok(self.backup()?.list(&self.user_id).await?)
    }

    /// Top characters by level, then experience. `limit` is clamped to 1..=100.
    pub async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, SyncError> {
        let limit = clamp_leaderboard_limit(limit);
        let entries = self.backup()?.top(limit).await?;
        Ok(rank_leaderboard(entries, limit))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Cloud sync is not configured")]
    Disabled,
    #[error("Character not found")]
    CharacterNotFound,
    #[error("Backup error: {0}")]
    Backup(#[from] BackupError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::*;
    use taleforge_domain::CharacterClass;

    use crate::infrastructure::ports::MockBackupPort;
    use crate::test_fixtures::{Harness, RecordingNarrator};

    fn cloud(h: &Harness, backup: MockBackupPort) -> CloudSync {
        CloudSync::new(h.characters.clone(), Some(Arc::new(backup)), "player-1", h.clock.clone())
    }

    fn entry(name: &str, level: u32, experience: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            character_id: CharacterId::new(),
            character_name: name.to_string(),
            class: CharacterClass::Warrior,
            level,
            experience,
        }
    }

    #[tokio::test]
    async fn sync_backs_up_submits_score_and_marks_synced() {
        let h = Harness::new(RecordingNarrator::replying("..."));
        let c = h
            .seed(Character::create(
                "Brom",
                CharacterClass::Warrior,
                &Default::default(),
                h.clock.0,
            ))
            .await;
        assert!(!c.is_synced);

        let mut backup = MockBackupPort::new();
        let id = c.id;
        backup
            .expect_backup()
            .withf(move |s| {
                s.user_id == "player-1" && s.character_name == "Brom" && s.character.id == id
            })
            .times(1)
            .returning(|_| Ok(()));
        backup
            .expect_submit_score()
            .withf(move |e| e.character_id == id && e.level == 1)
            .times(1)
            .returning(|_| Ok(()));

        let synced = cloud(&h, backup).sync_character(c.id).await.expect("sync");
        assert!(synced.is_synced);
        assert_eq!(synced.last_synced_at, Some(h.clock.0));

        let stored = h.characters.get(c.id).await.expect("get").expect("stored");
        assert!(stored.is_synced);
    }

    #[tokio::test]
    async fn failed_backup_leaves_character_unsynced() {
        let h = Harness::new(RecordingNarrator::replying("..."));
        let c = h
            .seed(Character::create(
                "Brom",
                CharacterClass::Warrior,
                &Default::default(),
                h.clock.0,
            ))
            .await;

        let mut backup = MockBackupPort::new();
        backup.expect_backup().returning(|_| {
            Err(BackupError::Status {
                status: 503,
                message: "down".to_string(),
            })
        });
        backup.expect_submit_score().never();

        let result = cloud(&h, backup).sync_character(c.id).await;
        assert!(matches!(result, Err(SyncError::Backup(_))));
        let stored = h.characters.get(c.id).await.expect("get").expect("stored");
        assert!(!stored.is_synced);
        assert_eq!(stored.last_synced_at, None);
    }

    #[tokio::test]
    async fn restore_upserts_the_snapshot() {
        let h = Harness::new(RecordingNarrator::replying("..."));
        let mut saved = Character::create(
            "Mira",
            CharacterClass::Mage,
            &Default::default(),
            h.clock.0,
        );
        saved.level = 4;
        let snapshot = CharacterSnapshot::of("player-1", &saved, h.clock.0);

        let mut backup = MockBackupPort::new();
        backup
            .expect_restore()
            .withf(|user_id, name| user_id == "player-1" && name == "Mira")
            .times(1)
            .returning(move |_, _| Ok(Some(snapshot.clone())));

        let restored = cloud(&h, backup)
            .restore_character("Mira")
            .await
            .expect("restore")
            .expect("snapshot found");
        assert_eq!(restored.level, 4);

        let stored = h.characters.get_by_name("Mira").await.expect("get").expect("stored");
        assert_eq!(stored, saved);
    }

    #[tokio::test]
    async fn backups_are_listed_for_the_configured_user() {
        let h = Harness::new(RecordingNarrator::replying("..."));
        let mut backup = MockBackupPort::new();
        backup
            .expect_list()
            .withf(|user_id| user_id == "player-1")
            .times(1)
            .returning(|_| {
                Ok(vec![BackupSummary {
                    id: "b-1".to_string(),
                    character_name: "Mira".to_string(),
                    level: 3,
                    last_backup_date: None,
                }])
            });

        let backups = cloud(&h, backup).list_backups().await.expect("list");
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0].character_name, "Mira");
    }

    #[tokio::test]
    async fn leaderboard_is_clamped_and_ranked() {
        let h = Harness::new(RecordingNarrator::replying("..."));
        let mut backup = MockBackupPort::new();
        backup
            .expect_top()
            .with(eq(100))
            .times(1)
            .returning(|_| Ok(vec![entry("a", 2, 10), entry("b", 3, 0), entry("c", 2, 500)]));

        let board = cloud(&h, backup).leaderboard(500).await.expect("leaderboard");
        let names: Vec<_> = board.iter().map(|e| e.character_name.as_str()).collect();
        assert_eq!(names, ["b", "c", "a"]);
    }

    #[tokio::test]
    async fn everything_fails_when_disabled() {
        let h = Harness::new(RecordingNarrator::replying("..."));
        let sync = CloudSync::new(h.characters.clone(), None, "player-1", h.clock.clone());

        assert!(!sync.is_enabled());
        assert!(matches!(sync.leaderboard(10).await, Err(SyncError::Disabled)));
        assert!(matches!(
            sync.restore_character("Mira").await,
            Err(SyncError::Disabled)
        ));
    }
}
