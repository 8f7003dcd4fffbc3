//! Error types for port operations.

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Entity not found - includes entity type and ID for actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Business constraint violated.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl RepoError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors from the narration capability. Never shown to players; the engine
/// substitutes a fallback narrative instead.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NarratorError {
    #[error("Narrator unavailable: {0}")]
    Unavailable(String),
    #[error("Narration failed: {0}")]
    Llm(#[from] LlmError),
}

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("Backup request failed: {0}")]
    RequestFailed(String),
    #[error("Backup service returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Invalid backup response: {0}")]
    InvalidResponse(String),
}
