use std::fmt;

use crate::domain::chat::models::ChatId;
use crate::domain::user::models::UserId;

/// Link between a user and a chat. At most one per pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserChat {
    pub user_id: UserId,
    pub chat_id: ChatId,
}

impl UserChat {
    pub fn new(user_id: UserId, chat_id: ChatId) -> Self {
        Self { user_id, chat_id }
    }
}

impl fmt::Display for UserChat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.chat_id)
    }
}
