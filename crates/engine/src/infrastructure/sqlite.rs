//! SQLite-backed document store.
//!
//! Characters and sessions are stored as JSON documents keyed by id, with a few
//! columns pulled out for lookups.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use sqlx::{Row, SqlitePool};

use taleforge_domain::{Character, CharacterId, GameState};

use crate::infrastructure::ports::{CharacterRepo, GameStateRepo, RepoError};

pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    pub async fn new(db_path: &str) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("connect", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS characters (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL,
                document TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("schema", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS game_states (
                character_id TEXT PRIMARY KEY,
                updated_at TEXT NOT NULL,
                document TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("schema", e))?;

        Ok(Self { pool })
    }
}

fn decode<T: DeserializeOwned>(row: &sqlx::sqlite::SqliteRow) -> Result<T, RepoError> {
    let json: String = row.get("document");
    serde_json::from_str(&json).map_err(RepoError::serialization)
}

#[async_trait]
impl CharacterRepo for SqliteDocumentStore {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        let row = sqlx::query("SELECT document FROM characters WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_character", e))?;
        row.as_ref().map(decode).transpose()
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Character>, RepoError> {
        let row = sqlx::query(
            "SELECT document FROM characters WHERE name = ? ORDER BY created_at LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("get_character_by_name", e))?;
        row.as_ref().map(decode).transpose()
    }

    async fn list(&self) -> Result<Vec<Character>, RepoError> {
        let rows = sqlx::query("SELECT document FROM characters ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("list_characters", e))?;
        rows.iter().map(decode).collect()
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        let json = serde_json::to_string(character).map_err(RepoError::serialization)?;

        sqlx::query(
            r#"
            INSERT INTO characters (id, name, created_at, document)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                document = excluded.document
            "#,
        )
        .bind(character.id.to_string())
        .bind(character.name.as_str())
        .bind(character.created_at.to_rfc3339())
        .bind(json)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("save_character", e))?;

        Ok(())
    }

    async fn delete(&self, id: CharacterId) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM characters WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("delete_character", e))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl GameStateRepo for SqliteDocumentStore {
    async fn get_by_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<GameState>, RepoError> {
        let row = sqlx::query("SELECT document FROM game_states WHERE character_id = ?")
            .bind(character_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_game_state", e))?;
        row.as_ref().map(decode).transpose()
    }

    async fn save(&self, state: &GameState) -> Result<(), RepoError> {
        let json = serde_json::to_string(state).map_err(RepoError::serialization)?;

        sqlx::query(
            r#"
            INSERT INTO game_states (character_id, updated_at, document)
            VALUES (?, ?, ?)
            ON CONFLICT(character_id) DO UPDATE SET
                updated_at = excluded.updated_at,
                document = excluded.document
            "#,
        )
        .bind(state.character_id.to_string())
        .bind(state.last_updated.to_rfc3339())
        .bind(json)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("save_game_state", e))?;

        Ok(())
    }

    async fn delete_by_character(&self, character_id: CharacterId) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM game_states WHERE character_id = ?")
            .bind(character_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("delete_game_state", e))?;
        Ok(result.rows_affected() > 0)
    }
}
