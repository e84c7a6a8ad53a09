use auth::AuthError;
use thiserror::Error;

use crate::domain::chat::errors::ChatError;
use crate::domain::user::errors::UserError;

#[derive(Debug, Clone, Error)]
pub enum UserChatError {
    #[error("User-chat relation not found: {0}")]
    NotFound(String),

    #[error("User does not exist: {0}")]
    UserNotFound(String),

    #[error("Chat does not exist: {0}")]
    ChatNotFound(String),

    #[error("User-chat relation already exists: {0}")]
    AlreadyExists(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Lookups against the user and chat repositories only fail on storage errors.
impl From<UserError> for UserChatError {
    fn from(err: UserError) -> Self {
        UserChatError::DatabaseError(err.to_string())
    }
}

impl From<ChatError> for UserChatError {
    fn from(err: ChatError) -> Self {
        UserChatError::DatabaseError(err.to_string())
    }
}
