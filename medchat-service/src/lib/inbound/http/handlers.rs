use auth::AuthError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::chat::errors::ChatError;
use crate::domain::chat::models::Chat;
use crate::domain::chat::models::ChatRecord;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::User;
use crate::domain::user_chat::errors::UserChatError;
use crate::domain::user_chat::models::UserChat;

pub mod create_chat;
pub mod create_user;
pub mod create_user_chat;
pub mod delete_chat;
pub mod delete_user;
pub mod delete_user_chat;
pub mod get_chat;
pub mod get_user;
pub mod get_user_chat;
pub mod list_chats;
pub mod list_user_chats;
pub mod list_users;
pub mod sign_in;
pub mod sign_up;
pub mod update_chat;
pub mod update_user;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

impl ApiError {
    /// Log the detail and hide it from the client.
    fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "Request failed");
        ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                tracing::warn!(kind = err.kind(), "Sign-in rejected");
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            ref e if e.is_unauthenticated() => {
                tracing::warn!(kind = e.kind(), error = %e, "Authentication failed");
                ApiError::Unauthorized("Invalid token".to_string())
            }
            AuthError::AuthorizationDenied(reason) => {
                tracing::info!(reason = reason.message(), "Authorization denied");
                ApiError::Forbidden(reason.message().to_string())
            }
            e => {
                tracing::error!(kind = e.kind(), error = %e, "Authentication internal error");
                ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
            }
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) | UserError::NotFoundByEmail(_) => {
                ApiError::NotFound(err.to_string())
            }
            UserError::EmailAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            UserError::InvalidUserId(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidPassword(_)
            | UserError::InvalidRole(_) => ApiError::BadRequest(err.to_string()),
            UserError::Auth(e) => ApiError::from(e),
            UserError::Hashing(_) | UserError::DatabaseError(_) => ApiError::internal(err),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ChatError::InvalidChatId(_) => ApiError::BadRequest(err.to_string()),
            ChatError::Auth(e) => ApiError::from(e),
            ChatError::DatabaseError(_) => ApiError::internal(err),
        }
    }
}

impl From<UserChatError> for ApiError {
    fn from(err: UserChatError) -> Self {
        match err {
            UserChatError::NotFound(_)
            | UserChatError::UserNotFound(_)
            | UserChatError::ChatNotFound(_) => ApiError::NotFound(err.to_string()),
            UserChatError::AlreadyExists(_) => ApiError::Conflict(err.to_string()),
            UserChatError::Auth(e) => ApiError::from(e),
            UserChatError::DatabaseError(_) => ApiError::internal(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Payload of operations that only confirm what happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub message: String,
}

impl MessageData {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Public view of a user. The password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserData {
    pub user_id: String,
    pub email: String,
    pub role: String,
    pub name: Option<String>,
    pub age: Option<i16>,
    pub height: Option<f32>,
    pub weight: Option<f32>,
    pub gender: Option<String>,
    pub physical_condition: Option<String>,
    pub medical_history: Option<String>,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        let profile = &user.profile;
        Self {
            user_id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            role: user.role.as_str().to_string(),
            name: profile.name.clone(),
            age: profile.age,
            height: profile.height,
            weight: profile.weight,
            gender: profile.gender.clone(),
            physical_condition: profile.physical_condition.clone(),
            medical_history: profile.medical_history.clone(),
            profile_image_url: profile.profile_image_url.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Body of sign-up, sign-in and admin provisioning responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthResponseData {
    pub message: String,
    pub token: String,
    pub expires_at: i64,
    pub user: UserData,
}

impl AuthResponseData {
    pub fn new(message: &str, issued: auth::IssuedToken, user: &User) -> Self {
        Self {
            message: message.to_string(),
            token: issued.token,
            expires_at: issued.expires_at,
            user: user.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatData {
    pub chat_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: ChatRecord,
}

impl From<&Chat> for ChatData {
    fn from(chat: &Chat) -> Self {
        Self {
            chat_id: chat.id.to_string(),
            user_id: chat.owner.to_string(),
            created_at: chat.created_at,
            updated_at: chat.updated_at,
            record: chat.record.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserChatData {
    pub user_id: String,
    pub chat_id: String,
}

impl From<&UserChat> for UserChatData {
    fn from(relation: &UserChat) -> Self {
        Self {
            user_id: relation.user_id.to_string(),
            chat_id: relation.chat_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use auth::DenyReason;
    use auth::TokenError;

    use super::*;

    #[test]
    fn test_auth_errors_hide_kind() {
        assert_eq!(
            ApiError::from(AuthError::from(TokenError::TokenExpired)),
            ApiError::Unauthorized("Invalid token".to_string())
        );
        assert_eq!(
            ApiError::from(AuthError::MissingCredential),
            ApiError::Unauthorized("Invalid token".to_string())
        );
        assert_eq!(
            ApiError::from(AuthError::InvalidCredentials),
            ApiError::Unauthorized("Invalid credentials".to_string())
        );
    }

    #[test]
    fn test_denial_surfaces_reason() {
        assert_eq!(
            ApiError::from(UserError::Auth(AuthError::AuthorizationDenied(
                DenyReason::AdminRequired
            ))),
            ApiError::Forbidden("admin role required".to_string())
        );
    }

    #[test]
    fn test_wiring_error_is_internal() {
        assert_eq!(
            ApiError::from(AuthError::NoAuthenticatedContext),
            ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_storage_details_not_leaked() {
        let err = ApiError::from(ChatError::DatabaseError("connection refused".to_string()));
        assert_eq!(
            err,
            ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_relation_errors() {
        assert!(matches!(
            ApiError::from(UserChatError::ChatNotFound("c".to_string())),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(UserChatError::AlreadyExists("u/c".to_string())),
            ApiError::Conflict(_)
        ));
    }
}
