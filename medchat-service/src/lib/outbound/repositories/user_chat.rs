use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use super::violated_unique_constraint;
use super::USER_CHAT_PRIMARY_KEY;
use crate::domain::chat::models::ChatId;
use crate::domain::user::models::UserId;
use crate::domain::user_chat::errors::UserChatError;
use crate::domain::user_chat::models::UserChat;
use crate::domain::user_chat::ports::UserChatRepository;

pub struct PostgresUserChatRepository {
    pool: PgPool,
}

impl PostgresUserChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserChatRow {
    user_id: Uuid,
    chat_id: Uuid,
}

impl From<UserChatRow> for UserChat {
    fn from(row: UserChatRow) -> Self {
        UserChat::new(UserId(row.user_id), ChatId(row.chat_id))
    }
}

fn database_error(err: sqlx::Error) -> UserChatError {
    UserChatError::DatabaseError(err.to_string())
}

#[async_trait]
impl UserChatRepository for PostgresUserChatRepository {
    async fn create(&self, relation: UserChat) -> Result<UserChat, UserChatError> {
        sqlx::query("INSERT INTO users_chats (user_id, chat_id) VALUES ($1, $2)")
            .bind(relation.user_id.0)
            .bind(relation.chat_id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if violated_unique_constraint(&e).as_deref() == Some(USER_CHAT_PRIMARY_KEY) {
                    return UserChatError::AlreadyExists(relation.to_string());
                }
                database_error(e)
            })?;

        Ok(relation)
    }

    async fn find(&self, relation: &UserChat) -> Result<Option<UserChat>, UserChatError> {
        let row = sqlx::query_as::<_, UserChatRow>(
            "SELECT user_id, chat_id FROM users_chats WHERE user_id = $1 AND chat_id = $2",
        )
        .bind(relation.user_id.0)
        .bind(relation.chat_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(row.map(UserChat::from))
    }

    async fn list_all(&self) -> Result<Vec<UserChat>, UserChatError> {
        let rows = sqlx::query_as::<_, UserChatRow>("SELECT user_id, chat_id FROM users_chats")
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(rows.into_iter().map(UserChat::from).collect())
    }

    async fn delete(&self, relation: &UserChat) -> Result<(), UserChatError> {
        let result = sqlx::query("DELETE FROM users_chats WHERE user_id = $1 AND chat_id = $2")
            .bind(relation.user_id.0)
            .bind(relation.chat_id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(UserChatError::NotFound(relation.to_string()));
        }

        Ok(())
    }
}
