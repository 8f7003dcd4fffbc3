//! Engine configuration, read from the environment.

use std::str::FromStr;

use crate::infrastructure::ollama::{DEFAULT_OLLAMA_BASE_URL, DEFAULT_OLLAMA_MODEL};
use crate::infrastructure::resilient_llm::RetryConfig;

/// Where characters and sessions are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Sqlite { path: String },
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub store: StoreBackend,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub retry: RetryConfig,
    /// Cloud sync is disabled when unset.
    pub backup_url: Option<String>,
    pub user_id: String,
    /// Seeds dice rolls for replayable sessions.
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store: StoreBackend::Memory,
            ollama_base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            retry: RetryConfig::default(),
            backup_url: None,
            user_id: "local".to_string(),
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable numbers fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let store = match lookup("TALEFORGE_STORE").as_deref() {
            Some("sqlite") => StoreBackend::Sqlite {
                path: lookup("TALEFORGE_DB").unwrap_or_else(|| "taleforge.db".to_string()),
            },
            Some("memory") | None => StoreBackend::Memory,
            Some(other) => {
                tracing::warn!(store = other, "Unknown TALEFORGE_STORE, using memory");
                StoreBackend::Memory
            }
        };

        let retry = RetryConfig {
            max_retries: parse_or(&lookup, "LLM_MAX_RETRIES", defaults.retry.max_retries),
            base_delay_ms: parse_or(&lookup, "LLM_BASE_DELAY_MS", defaults.retry.base_delay_ms),
            ..defaults.retry
        };

        Self {
            store,
            ollama_base_url: lookup("OLLAMA_BASE_URL").unwrap_or(defaults.ollama_base_url),
            ollama_model: lookup("OLLAMA_MODEL").unwrap_or(defaults.ollama_model),
            retry,
            backup_url: lookup("TALEFORGE_BACKUP_URL").filter(|url| !url.trim().is_empty()),
            user_id: lookup("TALEFORGE_USER_ID").unwrap_or(defaults.user_id),
            rng_seed: lookup("TALEFORGE_RNG_SEED").and_then(|raw| match raw.parse() {
                Ok(seed) => Some(seed),
                Err(_) => {
                    tracing::warn!(value = %raw, "Invalid TALEFORGE_RNG_SEED, ignoring");
                    None
                }
            }),
        }
    }
}

fn parse_or<T: FromStr + Copy>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Invalid number in environment, using default");
            default
        }),
        None => default,
    }
}
