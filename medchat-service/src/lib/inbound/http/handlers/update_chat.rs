use auth::Identity;
use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;

use super::ApiError;
use super::ApiSuccess;
use super::ChatData;
use crate::domain::chat::errors::ChatError;
use crate::domain::chat::models::ChatId;
use crate::domain::chat::models::ChatRecord;
use crate::domain::chat::ports::ChatServicePort;
use crate::inbound::http::router::AppState;

/// Replace the record of a chat. Fields missing from the body are cleared.
pub async fn update_chat(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Path(chat_id): Path<String>,
    body: Result<Json<ChatRecord>, JsonRejection>,
) -> Result<ApiSuccess<ChatData>, ApiError> {
    let Json(record) = body?;
    let chat_id = ChatId::from_string(&chat_id).map_err(ChatError::from)?;

    state
        .chat_service
        .update_chat(&caller, &chat_id, record)
        .await
        .map_err(ApiError::from)
        .map(|ref chat| ApiSuccess::new(StatusCode::OK, chat.into()))
}
