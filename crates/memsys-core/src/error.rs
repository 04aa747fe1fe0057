//! Error types for memsys-core.

use thiserror::Error;

/// Result type alias using memsys-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Memory System operations
#[derive(Error, Debug)]
pub enum Error {
    // Database errors
    #[cfg(feature = "db")]
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    // Validation errors
    #[error("Invalid input: {0}")]
    Validation(String),

    // Auth errors
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Malformed password hash")]
    MalformedPasswordHash,

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a not-found error for an entity
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
