use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::UserChatData;
use crate::domain::chat::models::ChatId;
use crate::domain::user::models::UserId;
use crate::domain::user_chat::models::UserChat;
use crate::domain::user_chat::ports::UserChatServicePort;
use crate::inbound::http::router::AppState;

pub async fn get_user_chat(
    State(state): State<AppState>,
    Path((user_id, chat_id)): Path<(String, String)>,
) -> Result<ApiSuccess<UserChatData>, ApiError> {
    let relation = parse_relation(&user_id, &chat_id)?;

    state
        .user_chat_service
        .get_relation(&relation)
        .await
        .map_err(ApiError::from)
        .map(|ref relation| ApiSuccess::new(StatusCode::OK, relation.into()))
}

/// Parse the two path segments naming a relation.
pub(super) fn parse_relation(user_id: &str, chat_id: &str) -> Result<UserChat, ApiError> {
    let user_id =
        UserId::from_string(user_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let chat_id =
        ChatId::from_string(chat_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    Ok(UserChat::new(user_id, chat_id))
}
