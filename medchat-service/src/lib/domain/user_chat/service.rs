use std::sync::Arc;

use async_trait::async_trait;
use auth::authorize;
use auth::Action;
use auth::Identity;

use crate::domain::chat::ports::ChatRepository;
use crate::domain::user::ports::UserRepository;
use crate::domain::user_chat::errors::UserChatError;
use crate::domain::user_chat::models::UserChat;
use crate::domain::user_chat::ports::UserChatRepository;
use crate::domain::user_chat::ports::UserChatServicePort;

/// Domain service for user-chat relations.
///
/// Needs the user and chat repositories to check that both ends of a new
/// relation exist.
pub struct UserChatService<LR, UR, CR>
where
    LR: UserChatRepository,
    UR: UserRepository,
    CR: ChatRepository,
{
    relations: Arc<LR>,
    users: Arc<UR>,
    chats: Arc<CR>,
}

impl<LR, UR, CR> UserChatService<LR, UR, CR>
where
    LR: UserChatRepository,
    UR: UserRepository,
    CR: ChatRepository,
{
    pub fn new(relations: Arc<LR>, users: Arc<UR>, chats: Arc<CR>) -> Self {
        Self {
            relations,
            users,
            chats,
        }
    }
}

#[async_trait]
impl<LR, UR, CR> UserChatServicePort for UserChatService<LR, UR, CR>
where
    LR: UserChatRepository,
    UR: UserRepository,
    CR: ChatRepository,
{
    async fn list_relations(&self) -> Result<Vec<UserChat>, UserChatError> {
        self.relations.list_all().await
    }

    async fn get_relation(&self, relation: &UserChat) -> Result<UserChat, UserChatError> {
        self.relations
            .find(relation)
            .await?
            .ok_or(UserChatError::NotFound(relation.to_string()))
    }

    async fn create_relation(
        &self,
        caller: &Identity,
        relation: UserChat,
    ) -> Result<UserChat, UserChatError> {
        authorize(caller, Action::Create, Some(relation.user_id.0)).into_result()?;

        if self.users.find_by_id(&relation.user_id).await?.is_none() {
            return Err(UserChatError::UserNotFound(relation.user_id.to_string()));
        }

        if self.chats.find_by_id(&relation.chat_id).await?.is_none() {
            return Err(UserChatError::ChatNotFound(relation.chat_id.to_string()));
        }

        if self.relations.find(&relation).await?.is_some() {
            return Err(UserChatError::AlreadyExists(relation.to_string()));
        }

        self.relations.create(relation).await
    }

    async fn delete_relation(
        &self,
        caller: &Identity,
        relation: &UserChat,
    ) -> Result<(), UserChatError> {
        authorize(caller, Action::Delete, Some(relation.user_id.0)).into_result()?;
        self.relations.delete(relation).await
    }
}

#[cfg(test)]
mod tests {
    use auth::AuthError;
    use auth::Role;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::chat::errors::ChatError;
    use crate::domain::chat::models::Chat;
    use crate::domain::chat::models::ChatId;
    use crate::domain::chat::models::ChatRecord;
    use crate::domain::user::errors::UserError;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::User;
    use crate::domain::user::models::UserChanges;
    use crate::domain::user::models::UserId;
    use crate::domain::user::models::UserProfile;

    mock! {
        pub TestUserChatRepository {}

        #[async_trait]
        impl UserChatRepository for TestUserChatRepository {
            async fn create(&self, relation: UserChat) -> Result<UserChat, UserChatError>;
            async fn find(&self, relation: &UserChat) -> Result<Option<UserChat>, UserChatError>;
            async fn list_all(&self) -> Result<Vec<UserChat>, UserChatError>;
            async fn delete(&self, relation: &UserChat) -> Result<(), UserChatError>;
        }
    }

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
            async fn list_all(&self) -> Result<Vec<User>, UserError>;
            async fn update(&self, id: &UserId, changes: &UserChanges) -> Result<User, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

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

    fn user(id: UserId) -> User {
        let now = Utc::now();
        User {
            id,
            email: EmailAddress::new("a@x.com".to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            role: Role::User,
            profile: UserProfile::default(),
            created_at: now,
            updated_at: now,
        }
    }

    fn chat(id: ChatId, owner: UserId) -> Chat {
        let now = Utc::now();
        Chat {
            id,
            owner,
            record: ChatRecord::default(),
            created_at: now,
            updated_at: now,
        }
    }

    struct Fixture {
        relations: MockTestUserChatRepository,
        users: MockTestUserRepository,
        chats: MockTestChatRepository,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                relations: MockTestUserChatRepository::new(),
                users: MockTestUserRepository::new(),
                chats: MockTestChatRepository::new(),
            }
        }

        fn with_existing(mut self, relation: UserChat) -> Self {
            self.users
                .expect_find_by_id()
                .returning(|id| Ok(Some(user(*id))));
            self.chats
                .expect_find_by_id()
                .returning(move |id| Ok(Some(chat(*id, relation.user_id))));
            self
        }

        fn service(
            self,
        ) -> UserChatService<MockTestUserChatRepository, MockTestUserRepository, MockTestChatRepository>
        {
            UserChatService::new(
                Arc::new(self.relations),
                Arc::new(self.users),
                Arc::new(self.chats),
            )
        }
    }

    fn owner_of(relation: &UserChat) -> Identity {
        Identity::new(relation.user_id.0, "a@x.com", Role::User)
    }

    #[tokio::test]
    async fn test_create_relation() {
        let relation = UserChat::new(UserId::new(), ChatId::new());
        let mut fixture = Fixture::new().with_existing(relation);

        fixture.relations.expect_find().returning(|_| Ok(None));
        fixture
            .relations
            .expect_create()
            .times(1)
            .returning(|relation| Ok(relation));

        let created = fixture
            .service()
            .create_relation(&owner_of(&relation), relation)
            .await
            .unwrap();

        assert_eq!(created, relation);
    }

    #[tokio::test]
    async fn test_create_duplicate_relation() {
        let relation = UserChat::new(UserId::new(), ChatId::new());
        let mut fixture = Fixture::new().with_existing(relation);

        fixture
            .relations
            .expect_find()
            .returning(|relation| Ok(Some(*relation)));
        fixture.relations.expect_create().times(0);

        let result = fixture
            .service()
            .create_relation(&owner_of(&relation), relation)
            .await;

        assert!(matches!(result, Err(UserChatError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_create_relation_for_missing_chat() {
        let relation = UserChat::new(UserId::new(), ChatId::new());
        let mut fixture = Fixture::new();

        fixture
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(*id))));
        fixture.chats.expect_find_by_id().returning(|_| Ok(None));
        fixture.relations.expect_create().times(0);

        let result = fixture
            .service()
            .create_relation(&owner_of(&relation), relation)
            .await;

        assert!(matches!(result, Err(UserChatError::ChatNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_relation_for_other_user_denied() {
        let relation = UserChat::new(UserId::new(), ChatId::new());
        let mut fixture = Fixture::new();
        fixture.users.expect_find_by_id().times(0);

        let stranger = Identity::new(uuid::Uuid::new_v4(), "b@x.com", Role::User);
        let result = fixture.service().create_relation(&stranger, relation).await;

        assert!(matches!(
            result,
            Err(UserChatError::Auth(AuthError::AuthorizationDenied(_)))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_relation() {
        let relation = UserChat::new(UserId::new(), ChatId::new());
        let mut fixture = Fixture::new();

        fixture
            .relations
            .expect_delete()
            .times(1)
            .returning(|relation| Err(UserChatError::NotFound(relation.to_string())));

        let admin = Identity::new(uuid::Uuid::new_v4(), "admin@x.com", Role::Admin);
        let result = fixture.service().delete_relation(&admin, &relation).await;

        assert!(matches!(result, Err(UserChatError::NotFound(_))));
    }
}
