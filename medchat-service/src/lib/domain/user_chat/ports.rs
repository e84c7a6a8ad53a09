use async_trait::async_trait;
use auth::Identity;

use crate::domain::user_chat::errors::UserChatError;
use crate::domain::user_chat::models::UserChat;

/// Port for user-chat relation operations.
#[async_trait]
pub trait UserChatServicePort: Send + Sync + 'static {
    async fn list_relations(&self) -> Result<Vec<UserChat>, UserChatError>;

    /// # Errors
    /// * `NotFound` - No such relation
    async fn get_relation(&self, relation: &UserChat) -> Result<UserChat, UserChatError>;

    /// Link a user to a chat.
    ///
    /// # Errors
    /// * `Auth(AuthorizationDenied)` - Caller is neither the linked user nor an admin
    /// * `UserNotFound` / `ChatNotFound` - Referenced user or chat does not exist
    /// * `AlreadyExists` - The pair is already linked
    async fn create_relation(
        &self,
        caller: &Identity,
        relation: UserChat,
    ) -> Result<UserChat, UserChatError>;

    /// # Errors
    /// * `Auth(AuthorizationDenied)` - Caller is neither the linked user nor an admin
    /// * `NotFound` - No such relation
    async fn delete_relation(
        &self,
        caller: &Identity,
        relation: &UserChat,
    ) -> Result<(), UserChatError>;
}

/// Persistence operations for user-chat relations.
#[async_trait]
pub trait UserChatRepository: Send + Sync + 'static {
    /// # Errors
    /// * `AlreadyExists` - The pair is already stored
    async fn create(&self, relation: UserChat) -> Result<UserChat, UserChatError>;

    async fn find(&self, relation: &UserChat) -> Result<Option<UserChat>, UserChatError>;

    async fn list_all(&self) -> Result<Vec<UserChat>, UserChatError>;

    /// # Errors
    /// * `NotFound` - No such relation
    async fn delete(&self, relation: &UserChat) -> Result<(), UserChatError>;
}
