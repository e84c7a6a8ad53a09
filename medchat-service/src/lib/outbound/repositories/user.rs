use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::QueryBuilder;
use uuid::Uuid;

use super::violated_unique_constraint;
use super::UNIQUE_EMAIL_CONSTRAINT;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::FieldValue;
use crate::domain::user::models::User;
use crate::domain::user::models::UserChanges;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::domain::user::ports::UserRepository;

const USER_COLUMNS: &str = "user_id, email, password_hash, role, name, age, height, weight, \
     gender, physical_condition, medical_history, profile_image_url, created_at, updated_at";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    password_hash: String,
    role: String,
    name: Option<String>,
    age: Option<i16>,
    height: Option<f32>,
    weight: Option<f32>,
    gender: Option<String>,
    physical_condition: Option<String>,
    medical_history: Option<String>,
    profile_image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.user_id),
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            role: row.role.parse()?,
            profile: UserProfile {
                name: row.name,
                age: row.age,
                height: row.height,
                weight: row.weight,
                gender: row.gender,
                physical_condition: row.physical_condition,
                medical_history: row.medical_history,
                profile_image_url: row.profile_image_url,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn map_write_error(err: sqlx::Error, email: Option<&EmailAddress>) -> UserError {
    match (violated_unique_constraint(&err).as_deref(), email) {
        (Some(UNIQUE_EMAIL_CONSTRAINT), Some(email)) => {
            UserError::EmailAlreadyExists(email.to_string())
        }
        (Some(UNIQUE_EMAIL_CONSTRAINT), None) => UserError::EmailAlreadyExists(String::new()),
        _ => UserError::DatabaseError(err.to_string()),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let profile = &user.profile;

        sqlx::query(
            r#"
            INSERT INTO users (user_id, email, password_hash, role, name, age, height, weight,
                               gender, physical_condition, medical_history, profile_image_url,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&profile.name)
        .bind(profile.age)
        .bind(profile.height)
        .bind(profile.weight)
        .bind(&profile.gender)
        .bind(&profile.physical_condition)
        .bind(&profile.medical_history)
        .bind(&profile.profile_image_url)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, Some(&user.email)))?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let query = format!("SELECT {} FROM users WHERE user_id = $1", USER_COLUMNS);

        sqlx::query_as::<_, UserRow>(&query)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        sqlx::query_as::<_, UserRow>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?
            .map(User::try_from)
            .transpose()
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let query = format!("SELECT {} FROM users ORDER BY created_at DESC", USER_COLUMNS);

        sqlx::query_as::<_, UserRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn update(&self, id: &UserId, changes: &UserChanges) -> Result<User, UserError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = NOW()");

        for (column, value) in changes.assignments() {
            builder.push(", ").push(column).push(" = ");
            match value {
                FieldValue::Text(v) => builder.push_bind(v),
                FieldValue::SmallInt(v) => builder.push_bind(v),
                FieldValue::Real(v) => builder.push_bind(v),
            };
        }

        builder
            .push(" WHERE user_id = ")
            .push_bind(id.0)
            .push(" RETURNING ")
            .push(USER_COLUMNS);

        let row = builder
            .build_query_as::<UserRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, changes.email.as_ref()))?;

        match row {
            Some(row) => User::try_from(row),
            None => Err(UserError::NotFound(id.to_string())),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
