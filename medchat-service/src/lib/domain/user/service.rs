use std::sync::Arc;

use async_trait::async_trait;
use auth::authorize;
use auth::permitted_role_change;
use auth::Action;
use auth::Identity;
use auth::Role;
use chrono::Utc;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserChanges;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    async fn insert(
        &self,
        email: EmailAddress,
        password: &Password,
        role: Role,
        profile: UserProfile,
    ) -> Result<User, UserError> {
        if self
            .repository
            .find_by_email(email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(email.to_string()));
        }

        let password_hash = self.password_hasher.hash(password.expose())?;
        let now = Utc::now();

        let user = User {
            id: UserId::new(),
            email,
            password_hash,
            role,
            profile,
            created_at: now,
            updated_at: now,
        };

        let created = self.repository.create(user).await?;
        tracing::info!(user_id = %created.id, role = %created.role, "User created");

        Ok(created)
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        self.insert(
            command.email,
            &command.password,
            Role::User,
            UserProfile::default(),
        )
        .await
    }

    async fn create_user(
        &self,
        caller: &Identity,
        command: CreateUserCommand,
    ) -> Result<User, UserError> {
        authorize(caller, Action::Create, None).into_result()?;

        self.insert(
            command.email,
            &command.password,
            command.role.unwrap_or_default(),
            command.profile,
        )
        .await
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, UserError> {
        self.repository
            .find_by_email(email.as_str())
            .await?
            .ok_or(UserError::NotFoundByEmail(email.to_string()))
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }

    async fn update_user(
        &self,
        caller: &Identity,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        authorize(caller, Action::Update, Some(id.0)).into_result()?;

        let role = requested_role(caller, id, command.role)?;

        let password_hash = command
            .password
            .as_ref()
            .map(|p| self.password_hasher.hash(p.expose()))
            .transpose()?;

        let changes = UserChanges {
            email: command.email,
            password_hash,
            role,
            name: command.name,
            age: command.age,
            height: command.height,
            weight: command.weight,
            gender: command.gender,
            physical_condition: command.physical_condition,
            medical_history: command.medical_history,
            profile_image_url: command.profile_image_url,
        };

        self.repository.update(id, &changes).await
    }

    async fn delete_user(&self, caller: &Identity, id: &UserId) -> Result<(), UserError> {
        authorize(caller, Action::Delete, Some(id.0)).into_result()?;

        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }
}

/// Role a caller may set on `id`.
///
/// A non-admin's role field is ignored whatever it contains; only an admin
/// can get `InvalidRole` back.
fn requested_role(
    caller: &Identity,
    id: &UserId,
    raw: Option<String>,
) -> Result<Option<Role>, UserError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    if !caller.is_admin() {
        tracing::info!(
            user_id = %id,
            caller = %caller.subject_id,
            "Dropping role change requested by non-admin"
        );
        return Ok(None);
    }

    let role = raw.parse::<Role>()?;
    Ok(permitted_role_change(caller, Some(role)))
}
