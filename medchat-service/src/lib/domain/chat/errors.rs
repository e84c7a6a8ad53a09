use auth::AuthError;
use thiserror::Error;

/// Error type for ChatId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Top-level error type for all chat-related operations
#[derive(Debug, Clone, Error)]
pub enum ChatError {
    #[error("Invalid chat ID: {0}")]
    InvalidChatId(#[from] ChatIdError),

    #[error("Chat not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),
}
