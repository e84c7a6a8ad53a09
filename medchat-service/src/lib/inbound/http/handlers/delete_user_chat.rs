use auth::Identity;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::get_user_chat::parse_relation;
use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::user_chat::ports::UserChatServicePort;
use crate::inbound::http::router::AppState;

pub async fn delete_user_chat(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Path((user_id, chat_id)): Path<(String, String)>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let relation = parse_relation(&user_id, &chat_id)?;

    state
        .user_chat_service
        .delete_relation(&caller, &relation)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new("User-chat relation deleted successfully"),
    ))
}
