use async_trait::async_trait;
use auth::Identity;

use crate::domain::chat::errors::ChatError;
use crate::domain::chat::models::Chat;
use crate::domain::chat::models::ChatId;
use crate::domain::chat::models::ChatRecord;
use crate::domain::user::models::UserId;

/// Port for chat domain service operations.
#[async_trait]
pub trait ChatServicePort: Send + Sync + 'static {
    /// Create a chat owned by `caller`.
    async fn create_chat(&self, caller: &Identity, record: ChatRecord) -> Result<Chat, ChatError>;

    /// # Errors
    /// * `NotFound` - Chat does not exist
    async fn get_chat(&self, id: &ChatId) -> Result<Chat, ChatError>;

    /// All chats, newest first.
    async fn list_chats(&self) -> Result<Vec<Chat>, ChatError>;

    /// Chats owned by `owner`, newest first.
    async fn list_chats_by_owner(&self, owner: &UserId) -> Result<Vec<Chat>, ChatError>;

    /// Replace every record field of a chat.
    ///
    /// # Arguments
    /// * `caller` - Authenticated identity making the request
    /// * `id` - Chat to update
    /// * `record` - New record; every field is overwritten
    ///
    /// # Returns
    /// The stored chat after the update
    ///
    /// # Errors
    /// * `NotFound` - Chat does not exist
    /// * `Auth(AuthorizationDenied)` - Caller is neither the owner nor an admin
    async fn update_chat(
        &self,
        caller: &Identity,
        id: &ChatId,
        record: ChatRecord,
    ) -> Result<Chat, ChatError>;

    /// # Errors
    /// * `NotFound` - Chat does not exist
    /// * `Auth(AuthorizationDenied)` - Caller is neither the owner nor an admin
    async fn delete_chat(&self, caller: &Identity, id: &ChatId) -> Result<(), ChatError>;
}

/// Persistence operations for chat aggregate.
#[async_trait]
pub trait ChatRepository: Send + Sync + 'static {
    async fn create(&self, chat: Chat) -> Result<Chat, ChatError>;

    async fn find_by_id(&self, id: &ChatId) -> Result<Option<Chat>, ChatError>;

    async fn list_all(&self) -> Result<Vec<Chat>, ChatError>;

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Chat>, ChatError>;

    /// Overwrite the record fields and bump `updated_at`.
    ///
    /// # Errors
    /// * `NotFound` - Chat does not exist
    async fn update(&self, id: &ChatId, record: &ChatRecord) -> Result<Chat, ChatError>;

    /// # Errors
    /// * `NotFound` - Chat does not exist
    async fn delete(&self, id: &ChatId) -> Result<(), ChatError>;
}
