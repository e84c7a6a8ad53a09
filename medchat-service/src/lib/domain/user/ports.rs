use async_trait::async_trait;
use auth::Identity;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserChanges;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for user domain service operations.
///
/// Mutating operations take the caller's [`Identity`] and consult the
/// authorization policy before touching storage.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Self-service sign-up. The role is always "user".
    ///
    /// # Arguments
    /// * `command` - Validated email and password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Hashing` - Password hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError>;

    /// Admin provisioning of an account, optionally with a role and profile.
    ///
    /// # Arguments
    /// * `caller` - Authenticated identity making the request
    /// * `command` - Validated credentials, requested role and profile
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `Auth(AuthorizationDenied)` - Caller is not an admin
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create_user(
        &self,
        caller: &Identity,
        command: CreateUserCommand,
    ) -> Result<User, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Arguments
    /// * `id` - User ID
    ///
    /// # Returns
    /// User entity
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// # Errors
    /// * `NotFoundByEmail` - No user with this email
    /// * `DatabaseError` - Database operation failed
    async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, UserError>;

    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    /// Partial update. A role in the command is dropped unless the caller is
    /// an admin, and only then is it parsed.
    ///
    /// # Arguments
    /// * `caller` - Authenticated identity making the request
    /// * `id` - User to update
    /// * `command` - Fields to change; absent fields are kept
    ///
    /// # Returns
    /// The stored user after the update
    ///
    /// # Errors
    /// * `Auth(AuthorizationDenied)` - Caller is neither the user nor an admin
    /// * `InvalidRole` - Admin caller sent a role other than "user" or "admin"
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update_user(
        &self,
        caller: &Identity,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError>;

    /// # Errors
    /// * `Auth(AuthorizationDenied)` - Caller is neither the user nor an admin
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_user(&self, caller: &Identity, id: &UserId) -> Result<(), UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Apply `changes` and bump `updated_at`, returning the stored row.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, id: &UserId, changes: &UserChanges) -> Result<User, UserError>;

    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}
