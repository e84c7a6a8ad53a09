pub mod chat;
pub mod user;
pub mod user_chat;
