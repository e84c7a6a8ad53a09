use auth::Identity;
use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating a user (raw JSON)
///
/// Absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub name: Option<String>,
    pub age: Option<i16>,
    pub height: Option<f32>,
    pub weight: Option<f32>,
    pub gender: Option<String>,
    pub physical_condition: Option<String>,
    pub medical_history: Option<String>,
    pub profile_image_url: Option<String>,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, UserError> {
        // Validation happens here - errors are automatically converted via #[from]
        Ok(UpdateUserCommand {
            email: self.email.map(EmailAddress::new).transpose()?,
            password: self.password.map(Password::new).transpose()?,
            role: self.role,
            name: self.name,
            age: self.age,
            height: self.height,
            weight: self.weight,
            gender: self.gender,
            physical_condition: self.physical_condition,
            medical_history: self.medical_history,
            profile_image_url: self.profile_image_url,
        })
    }
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Path(id): Path<String>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let Json(req) = body?;

    // Parse user ID and request at HTTP boundary - errors automatically converted
    let user_id = UserId::from_string(&id).map_err(UserError::from)?;
    let command = req.try_into_command()?;

    state
        .user_service
        .update_user(&caller, &user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_empty_command() {
        let request: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        let command = request.try_into_command().unwrap();

        assert!(command.email.is_none());
        assert!(command.password.is_none());
        assert!(command.role.is_none());
    }

    #[test]
    fn test_fields_validated() {
        let request = UpdateUserRequest {
            role: Some("admin".to_string()),
            weight: Some(80.0),
            ..UpdateUserRequest::default()
        };
        let command = request.try_into_command().unwrap();
        assert_eq!(command.role.as_deref(), Some("admin"));
        assert_eq!(command.weight, Some(80.0));

        // Role is checked by the service once the caller is known.
        let request = UpdateUserRequest {
            role: Some("superuser".to_string()),
            ..UpdateUserRequest::default()
        };
        assert_eq!(
            request.try_into_command().unwrap().role.as_deref(),
            Some("superuser")
        );

        let request = UpdateUserRequest {
            password: Some("123".to_string()),
            ..UpdateUserRequest::default()
        };
        assert!(matches!(
            request.try_into_command(),
            Err(UserError::InvalidPassword(_))
        ));
    }
}
