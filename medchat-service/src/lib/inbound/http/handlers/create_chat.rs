use auth::Identity;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;

use super::ApiError;
use super::ApiSuccess;
use super::ChatData;
use crate::domain::chat::models::ChatRecord;
use crate::domain::chat::ports::ChatServicePort;
use crate::inbound::http::router::AppState;

/// The new chat is owned by the caller.
pub async fn create_chat(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    body: Result<Json<ChatRecord>, JsonRejection>,
) -> Result<ApiSuccess<ChatData>, ApiError> {
    let Json(record) = body?;

    state
        .chat_service
        .create_chat(&caller, record)
        .await
        .map_err(ApiError::from)
        .map(|ref chat| ApiSuccess::new(StatusCode::CREATED, chat.into()))
}
