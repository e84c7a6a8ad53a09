use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::ChatData;
use crate::domain::chat::errors::ChatError;
use crate::domain::chat::models::ChatId;
use crate::domain::chat::ports::ChatServicePort;
use crate::inbound::http::router::AppState;

pub async fn get_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<ApiSuccess<ChatData>, ApiError> {
    let chat_id = ChatId::from_string(&chat_id).map_err(ChatError::from)?;

    state
        .chat_service
        .get_chat(&chat_id)
        .await
        .map_err(ApiError::from)
        .map(|ref chat| ApiSuccess::new(StatusCode::OK, chat.into()))
}
