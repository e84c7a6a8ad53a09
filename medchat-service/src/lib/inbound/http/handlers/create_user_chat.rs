use auth::Identity;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::get_user_chat::parse_relation;
use super::ApiError;
use super::ApiSuccess;
use super::UserChatData;
use crate::domain::user_chat::ports::UserChatServicePort;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUserChatRequest {
    user_id: String,
    chat_id: String,
}

pub async fn create_user_chat(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    body: Result<Json<CreateUserChatRequest>, JsonRejection>,
) -> Result<ApiSuccess<UserChatData>, ApiError> {
    let Json(body) = body?;
    let relation = parse_relation(&body.user_id, &body.chat_id)?;

    state
        .user_chat_service
        .create_relation(&caller, relation)
        .await
        .map_err(ApiError::from)
        .map(|ref relation| ApiSuccess::new(StatusCode::CREATED, relation.into()))
}
