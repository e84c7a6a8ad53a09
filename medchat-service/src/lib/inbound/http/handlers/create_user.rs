use auth::authorize;
use auth::Action;
use auth::AuthError;
use auth::Identity;
use auth::Role;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::AuthResponseData;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::UserProfile;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

/// Admin provisioning. Returns a token for the new account.
///
/// A non-admin is refused before the body is looked at.
pub async fn create_user(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    authorize(&caller, Action::Create, None).into_result()?;

    let Json(body) = body?;

    let user = state
        .user_service
        .create_user(&caller, body.try_into_command()?)
        .await?;

    let issued = state
        .authenticator
        .issue_token(&user.identity())
        .map_err(AuthError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        AuthResponseData::new("User created successfully", issued, &user),
    ))
}

/// HTTP request body for provisioning a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateUserRequest {
    email: String,
    password: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    age: Option<i16>,
    #[serde(default)]
    height: Option<f32>,
    #[serde(default)]
    weight: Option<f32>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    physical_condition: Option<String>,
    #[serde(default)]
    medical_history: Option<String>,
    #[serde(default)]
    profile_image_url: Option<String>,
}

impl CreateUserRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, UserError> {
        Ok(CreateUserCommand {
            email: EmailAddress::new(self.email)?,
            password: Password::new(self.password)?,
            role: self.role.map(|r| r.parse::<Role>()).transpose()?,
            profile: UserProfile {
                name: self.name,
                age: self.age,
                height: self.height,
                weight: self.weight,
                gender: self.gender,
                physical_condition: self.physical_condition,
                medical_history: self.medical_history,
                profile_image_url: self.profile_image_url,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_with_role_and_profile() {
        let request: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "email": "doc@x.com",
            "password": "secret1",
            "role": "admin",
            "age": 51,
            "medical_history": "none"
        }))
        .unwrap();

        let command = request.try_into_command().unwrap();

        assert_eq!(command.role, Some(Role::Admin));
        assert_eq!(command.profile.age, Some(51));
        assert_eq!(command.profile.medical_history.as_deref(), Some("none"));
        assert_eq!(command.profile.name, None);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let request: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "email": "doc@x.com",
            "password": "secret1",
            "role": "root"
        }))
        .unwrap();

        assert!(matches!(
            request.try_into_command(),
            Err(UserError::InvalidRole(_))
        ));
    }
}
