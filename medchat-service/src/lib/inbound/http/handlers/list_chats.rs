use auth::Identity;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::ChatData;
use crate::domain::chat::models::Chat;
use crate::domain::chat::ports::ChatServicePort;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

fn chat_list(chats: Vec<Chat>) -> ApiSuccess<Vec<ChatData>> {
    ApiSuccess::new(StatusCode::OK, chats.iter().map(ChatData::from).collect())
}

pub async fn list_chats(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<ChatData>>, ApiError> {
    Ok(chat_list(state.chat_service.list_chats().await?))
}

/// Chats owned by the caller.
pub async fn list_my_chats(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
) -> Result<ApiSuccess<Vec<ChatData>>, ApiError> {
    let owner = UserId(caller.subject_id);
    Ok(chat_list(
        state.chat_service.list_chats_by_owner(&owner).await?,
    ))
}
