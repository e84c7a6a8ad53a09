use std::sync::Arc;

use async_trait::async_trait;
use auth::authorize;
use auth::Action;
use auth::Identity;
use chrono::Utc;

use crate::domain::chat::errors::ChatError;
use crate::domain::chat::models::Chat;
use crate::domain::chat::models::ChatId;
use crate::domain::chat::models::ChatRecord;
use crate::domain::chat::ports::ChatRepository;
use crate::domain::chat::ports::ChatServicePort;
use crate::domain::user::models::UserId;

/// Domain service implementation for chat operations.
pub struct ChatService<CR>
where
    CR: ChatRepository,
{
    repository: Arc<CR>,
}

impl<CR> ChatService<CR>
where
    CR: ChatRepository,
{
    pub fn new(repository: Arc<CR>) -> Self {
        Self { repository }
    }

    /// Load the chat and check `caller` may perform `action` on it.
    async fn authorized(
        &self,
        caller: &Identity,
        action: Action,
        id: &ChatId,
    ) -> Result<Chat, ChatError> {
        let chat = self.get_chat(id).await?;

        if let Err(e) = authorize(caller, action, Some(chat.owner.0)).into_result() {
            tracing::info!(
                chat_id = %id,
                caller = %caller.subject_id,
                action = %action,
                "Chat access denied"
            );
            return Err(e.into());
        }

        Ok(chat)
    }
}

#[async_trait]
impl<CR> ChatServicePort for ChatService<CR>
where
    CR: ChatRepository,
{
    async fn create_chat(&self, caller: &Identity, record: ChatRecord) -> Result<Chat, ChatError> {
        let now = Utc::now();
        let chat = Chat {
            id: ChatId::new(),
            owner: UserId(caller.subject_id),
            record,
            created_at: now,
            updated_at: now,
        };

        self.repository.create(chat).await
    }

    async fn get_chat(&self, id: &ChatId) -> Result<Chat, ChatError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ChatError::NotFound(id.to_string()))
    }

    async fn list_chats(&self) -> Result<Vec<Chat>, ChatError> {
        self.repository.list_all().await
    }

    async fn list_chats_by_owner(&self, owner: &UserId) -> Result<Vec<Chat>, ChatError> {
        self.repository.list_by_owner(owner).await
    }

    async fn update_chat(
        &self,
        caller: &Identity,
        id: &ChatId,
        record: ChatRecord,
    ) -> Result<Chat, ChatError> {
        self.authorized(caller, Action::Update, id).await?;
        self.repository.update(id, &record).await
    }

    async fn delete_chat(&self, caller: &Identity, id: &ChatId) -> Result<(), ChatError> {
        self.authorized(caller, Action::Delete, id).await?;
        self.repository.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use auth::AuthError;
    use auth::Role;
    use mockall::mock;

    use super::*;

    mock! {
        pub TestChatRepository {}

        #[async_trait]
        impl ChatRepository for TestChatRepository {
            async fn create(&self, chat: Chat) -> Result<Chat, ChatError>;
            async fn find_by_id(&self, id: &ChatId) -> Result<Option<Chat>, ChatError>;
            async fn list_all(&self) -> Result<Vec<Chat>, ChatError>;
            async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Chat>, ChatError>;
            async fn update(&self, id: &ChatId, record: &ChatRecord) -> Result<Chat, ChatError>;
            async fn delete(&self, id: &ChatId) -> Result<(), ChatError>;
        }
    }

    fn chat(id: ChatId, owner: UserId) -> Chat {
        let now = Utc::now();
        Chat {
            id,
            owner,
            record: ChatRecord {
                disease: Some("flu".to_string()),
                ..ChatRecord::default()
            },
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_chat_owned_by_caller() {
        let mut repository = MockTestChatRepository::new();
        let caller = Identity::new(uuid::Uuid::new_v4(), "a@x.com", Role::User);
        let owner = UserId(caller.subject_id);

        repository
            .expect_create()
            .withf(move |chat| chat.owner == owner && chat.record.text.as_deref() == Some("hi"))
            .times(1)
            .returning(|chat| Ok(chat));

        let service = ChatService::new(Arc::new(repository));

        let created = service
            .create_chat(
                &caller,
                ChatRecord {
                    text: Some("hi".to_string()),
                    ..ChatRecord::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(created.owner, owner);
    }

    #[tokio::test]
    async fn test_update_by_owner() {
        let mut repository = MockTestChatRepository::new();
        let owner = UserId::new();
        let chat_id = ChatId::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(chat(chat_id, owner))));
        repository
            .expect_update()
            .withf(move |id, record| *id == chat_id && record.disease.is_none())
            .times(1)
            .returning(move |_, record| {
                let mut updated = chat(chat_id, owner);
                updated.record = record.clone();
                Ok(updated)
            });

        let service = ChatService::new(Arc::new(repository));
        let caller = Identity::new(owner.0, "a@x.com", Role::User);

        let updated = service
            .update_chat(&caller, &chat_id, ChatRecord::default())
            .await
            .unwrap();

        assert_eq!(updated.record, ChatRecord::default());
    }

    #[tokio::test]
    async fn test_update_by_other_user_denied() {
        let mut repository = MockTestChatRepository::new();
        let chat_id = ChatId::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(chat(chat_id, UserId::new()))));
        repository.expect_update().times(0);

        let service = ChatService::new(Arc::new(repository));
        let caller = Identity::new(uuid::Uuid::new_v4(), "b@x.com", Role::User);

        let result = service
            .update_chat(&caller, &chat_id, ChatRecord::default())
            .await;

        assert!(matches!(
            result,
            Err(ChatError::Auth(AuthError::AuthorizationDenied(_)))
        ));
    }

    #[tokio::test]
    async fn test_delete_by_admin() {
        let mut repository = MockTestChatRepository::new();
        let chat_id = ChatId::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(chat(chat_id, UserId::new()))));
        repository
            .expect_delete()
            .withf(move |id| *id == chat_id)
            .times(1)
            .returning(|_| Ok(()));

        let service = ChatService::new(Arc::new(repository));
        let admin = Identity::new(uuid::Uuid::new_v4(), "admin@x.com", Role::Admin);

        assert!(service.delete_chat(&admin, &chat_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_chat() {
        let mut repository = MockTestChatRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_delete().times(0);

        let service = ChatService::new(Arc::new(repository));
        let admin = Identity::new(uuid::Uuid::new_v4(), "admin@x.com", Role::Admin);

        let result = service.delete_chat(&admin, &ChatId::new()).await;
        assert!(matches!(result, Err(ChatError::NotFound(_))));
    }
}
