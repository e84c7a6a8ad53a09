use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Role;
use chrono::Utc;
use medchat_service::chat::errors::ChatError;
use medchat_service::chat::models::Chat;
use medchat_service::chat::models::ChatId;
use medchat_service::chat::models::ChatRecord;
use medchat_service::chat::ports::ChatRepository;
use medchat_service::chat::service::ChatService;
use medchat_service::config::AuthMode;
use medchat_service::inbound::http::router::create_router;
use medchat_service::user::errors::UserError;
use medchat_service::user::models::EmailAddress;
use medchat_service::user::models::User;
use medchat_service::user::models::UserChanges;
use medchat_service::user::models::UserId;
use medchat_service::user::models::UserProfile;
use medchat_service::user::ports::UserRepository;
use medchat_service::user::service::UserService;
use medchat_service::user_chat::errors::UserChatError;
use medchat_service::user_chat::models::UserChat;
use medchat_service::user_chat::ports::UserChatRepository;
use medchat_service::user_chat::service::UserChatService;
use serde_json::Value;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ADMIN_EMAIL: &str = "admin@medchat.test";
pub const ADMIN_PASSWORD: &str = "admin-pass";

/// Test application that spawns a real server over in-memory storage
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub admin_id: UserId,
    pub admin_token: String,
}

impl TestApp {
    /// Spawn the application in a background task with one seeded admin.
    pub async fn spawn(auth_mode: AuthMode) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(Authenticator::new(JWT_SECRET));

        let user_repository = Arc::new(InMemoryUserRepository::default());
        let chat_repository = Arc::new(InMemoryChatRepository::default());
        let user_chat_repository = Arc::new(InMemoryUserChatRepository::default());

        let admin = seed_admin(&user_repository, &authenticator).await;
        let admin_token = authenticator
            .issue_token(&admin.identity())
            .expect("Failed to issue admin token")
            .token;

        let user_service = Arc::new(UserService::new(Arc::clone(&user_repository)));
        let chat_service = Arc::new(ChatService::new(Arc::clone(&chat_repository)));
        let user_chat_service = Arc::new(UserChatService::new(
            user_chat_repository,
            user_repository,
            chat_repository,
        ));

        let router = create_router(
            user_service,
            chat_service,
            user_chat_service,
            authenticator,
            auth_mode,
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            admin_id: admin.id,
            admin_token,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(self.url(path))
    }

    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.put(self.url(path)).bearer_auth(token)
    }

    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(self.url(path)).bearer_auth(token)
    }

    /// Register through the public endpoint and return `(user_id, token)`.
    pub async fn sign_up(&self, email: &str, password: &str) -> (String, String) {
        let response = self
            .post("/auth/signup")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        (
            body["data"]["user"]["user_id"].as_str().unwrap().to_string(),
            body["data"]["token"].as_str().unwrap().to_string(),
        )
    }

    /// Create a chat as the bearer of `token` and return its id.
    pub async fn create_chat(&self, token: &str, disease: &str) -> String {
        let response = self
            .post_authenticated("/api/chats", token)
            .json(&serde_json::json!({ "disease": disease, "L": "left knee" }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["chat_id"].as_str().unwrap().to_string()
    }
}

async fn seed_admin(repository: &InMemoryUserRepository, authenticator: &Authenticator) -> User {
    let now = Utc::now();
    let admin = User {
        id: UserId::new(),
        email: EmailAddress::new(ADMIN_EMAIL.to_string()).unwrap(),
        password_hash: authenticator.hash_password(ADMIN_PASSWORD).unwrap(),
        role: Role::Admin,
        profile: UserProfile::default(),
        created_at: now,
        updated_at: now,
    };

    repository.create(admin).await.expect("Failed to seed admin")
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn update(&self, id: &UserId, changes: &UserChanges) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        if let Some(email) = &changes.email {
            if users.values().any(|u| u.id != *id && u.email == *email) {
                return Err(UserError::EmailAlreadyExists(email.to_string()));
            }
        }

        let user = users
            .get_mut(id)
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;
        user.apply(changes, Utc::now());
        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.users
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }
}

#[derive(Default)]
pub struct InMemoryChatRepository {
    chats: Mutex<HashMap<ChatId, Chat>>,
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn create(&self, chat: Chat) -> Result<Chat, ChatError> {
        self.chats.lock().unwrap().insert(chat.id, chat.clone());
        Ok(chat)
    }

    async fn find_by_id(&self, id: &ChatId) -> Result<Option<Chat>, ChatError> {
        Ok(self.chats.lock().unwrap().get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Chat>, ChatError> {
        let mut chats: Vec<Chat> = self.chats.lock().unwrap().values().cloned().collect();
        chats.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(chats)
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Chat>, ChatError> {
        let mut chats = self.list_all().await?;
        chats.retain(|c| c.owner == *owner);
        Ok(chats)
    }

    async fn update(&self, id: &ChatId, record: &ChatRecord) -> Result<Chat, ChatError> {
        let mut chats = self.chats.lock().unwrap();
        let chat = chats
            .get_mut(id)
            .ok_or_else(|| ChatError::NotFound(id.to_string()))?;
        chat.record = record.clone();
        chat.updated_at = Utc::now();
        Ok(chat.clone())
    }

    async fn delete(&self, id: &ChatId) -> Result<(), ChatError> {
        self.chats
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ChatError::NotFound(id.to_string()))
    }
}

#[derive(Default)]
pub struct InMemoryUserChatRepository {
    relations: Mutex<HashSet<UserChat>>,
}

#[async_trait]
impl UserChatRepository for InMemoryUserChatRepository {
    async fn create(&self, relation: UserChat) -> Result<UserChat, UserChatError> {
        if !self.relations.lock().unwrap().insert(relation) {
            return Err(UserChatError::AlreadyExists(relation.to_string()));
        }
        Ok(relation)
    }

    async fn find(&self, relation: &UserChat) -> Result<Option<UserChat>, UserChatError> {
        Ok(self.relations.lock().unwrap().get(relation).copied())
    }

    async fn list_all(&self) -> Result<Vec<UserChat>, UserChatError> {
        Ok(self.relations.lock().unwrap().iter().copied().collect())
    }

    async fn delete(&self, relation: &UserChat) -> Result<(), UserChatError> {
        if !self.relations.lock().unwrap().remove(relation) {
            return Err(UserChatError::NotFound(relation.to_string()));
        }
        Ok(())
    }
}
