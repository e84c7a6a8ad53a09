use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::UserChatData;
use crate::domain::user_chat::ports::UserChatServicePort;
use crate::inbound::http::router::AppState;

pub async fn list_user_chats(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<UserChatData>>, ApiError> {
    let relations = state.user_chat_service.list_relations().await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        relations.iter().map(UserChatData::from).collect(),
    ))
}
