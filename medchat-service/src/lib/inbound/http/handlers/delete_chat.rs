use auth::Identity;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::chat::errors::ChatError;
use crate::domain::chat::models::ChatId;
use crate::domain::chat::ports::ChatServicePort;
use crate::inbound::http::router::AppState;

pub async fn delete_chat(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Path(chat_id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let chat_id = ChatId::from_string(&chat_id).map_err(ChatError::from)?;

    state.chat_service.delete_chat(&caller, &chat_id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new("Chat deleted successfully"),
    ))
}
