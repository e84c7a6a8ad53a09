use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::chat::errors::ChatError;
use crate::domain::chat::models::Chat;
use crate::domain::chat::models::ChatId;
use crate::domain::chat::models::ChatRecord;
use crate::domain::chat::ports::ChatRepository;
use crate::domain::user::models::UserId;

const CHAT_COLUMNS: &str = "chat_id, user_id, created_at, updated_at, disease, text, name, age, \
     height, weight, blood_pressure, pulse, gender, physical_condition, medical_history, \
     l, o, d, c, r, a, f, t";

pub struct PostgresChatRepository {
    pool: PgPool,
}

impl PostgresChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ChatRow {
    chat_id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    disease: Option<String>,
    text: Option<String>,
    name: Option<String>,
    age: Option<i16>,
    height: Option<f32>,
    weight: Option<f32>,
    blood_pressure: Option<String>,
    pulse: Option<i16>,
    gender: Option<String>,
    physical_condition: Option<String>,
    medical_history: Option<String>,
    l: Option<String>,
    o: Option<String>,
    d: Option<String>,
    c: Option<String>,
    r: Option<String>,
    a: Option<String>,
    f: Option<String>,
    t: Option<String>,
}

impl From<ChatRow> for Chat {
    fn from(row: ChatRow) -> Self {
        Chat {
            id: ChatId(row.chat_id),
            owner: UserId(row.user_id),
            record: ChatRecord {
                disease: row.disease,
                text: row.text,
                name: row.name,
                age: row.age,
                height: row.height,
                weight: row.weight,
                blood_pressure: row.blood_pressure,
                pulse: row.pulse,
                gender: row.gender,
                physical_condition: row.physical_condition,
                medical_history: row.medical_history,
                l: row.l,
                o: row.o,
                d: row.d,
                c: row.c,
                r: row.r,
                a: row.a,
                f: row.f,
                t: row.t,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn database_error(err: sqlx::Error) -> ChatError {
    ChatError::DatabaseError(err.to_string())
}

#[async_trait]
impl ChatRepository for PostgresChatRepository {
    async fn create(&self, chat: Chat) -> Result<Chat, ChatError> {
        let record = &chat.record;

        sqlx::query(
            r#"
            INSERT INTO chats (chat_id, user_id, created_at, updated_at, disease, text, name, age,
                               height, weight, blood_pressure, pulse, gender, physical_condition,
                               medical_history, l, o, d, c, r, a, f, t)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21, $22, $23)
            "#,
        )
        .bind(chat.id.0)
        .bind(chat.owner.0)
        .bind(chat.created_at)
        .bind(chat.updated_at)
        .bind(&record.disease)
        .bind(&record.text)
        .bind(&record.name)
        .bind(record.age)
        .bind(record.height)
        .bind(record.weight)
        .bind(&record.blood_pressure)
        .bind(record.pulse)
        .bind(&record.gender)
        .bind(&record.physical_condition)
        .bind(&record.medical_history)
        .bind(&record.l)
        .bind(&record.o)
        .bind(&record.d)
        .bind(&record.c)
        .bind(&record.r)
        .bind(&record.a)
        .bind(&record.f)
        .bind(&record.t)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(chat)
    }

    async fn find_by_id(&self, id: &ChatId) -> Result<Option<Chat>, ChatError> {
        let query = format!("SELECT {} FROM chats WHERE chat_id = $1", CHAT_COLUMNS);

        let row = sqlx::query_as::<_, ChatRow>(&query)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(row.map(Chat::from))
    }

    async fn list_all(&self) -> Result<Vec<Chat>, ChatError> {
        let query = format!("SELECT {} FROM chats ORDER BY created_at DESC", CHAT_COLUMNS);

        let rows = sqlx::query_as::<_, ChatRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(rows.into_iter().map(Chat::from).collect())
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Chat>, ChatError> {
        let query = format!(
            "SELECT {} FROM chats WHERE user_id = $1 ORDER BY created_at DESC",
            CHAT_COLUMNS
        );

        let rows = sqlx::query_as::<_, ChatRow>(&query)
            .bind(owner.0)
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(rows.into_iter().map(Chat::from).collect())
    }

    async fn update(&self, id: &ChatId, record: &ChatRecord) -> Result<Chat, ChatError> {
        let query = format!(
            r#"
            UPDATE chats
            SET updated_at = NOW(), disease = $2, text = $3, name = $4, age = $5, height = $6,
                weight = $7, blood_pressure = $8, pulse = $9, gender = $10,
                physical_condition = $11, medical_history = $12,
                l = $13, o = $14, d = $15, c = $16, r = $17, a = $18, f = $19, t = $20
            WHERE chat_id = $1
            RETURNING {}
            "#,
            CHAT_COLUMNS
        );

        let row = sqlx::query_as::<_, ChatRow>(&query)
            .bind(id.0)
            .bind(&record.disease)
            .bind(&record.text)
            .bind(&record.name)
            .bind(record.age)
            .bind(record.height)
            .bind(record.weight)
            .bind(&record.blood_pressure)
            .bind(record.pulse)
            .bind(&record.gender)
            .bind(&record.physical_condition)
            .bind(&record.medical_history)
            .bind(&record.l)
            .bind(&record.o)
            .bind(&record.d)
            .bind(&record.c)
            .bind(&record.r)
            .bind(&record.a)
            .bind(&record.f)
            .bind(&record.t)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        row.map(Chat::from)
            .ok_or(ChatError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &ChatId) -> Result<(), ChatError> {
        let result = sqlx::query("DELETE FROM chats WHERE chat_id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(ChatError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
