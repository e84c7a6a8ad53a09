pub mod chat;
pub mod user;
pub mod user_chat;

pub use chat::PostgresChatRepository;
pub use user::PostgresUserRepository;
pub use user_chat::PostgresUserChatRepository;

const UNIQUE_EMAIL_CONSTRAINT: &str = "users_email_key";
const USER_CHAT_PRIMARY_KEY: &str = "users_chats_pkey";

/// Name of the unique constraint `err` violated, if that is what happened.
fn violated_unique_constraint(err: &sqlx::Error) -> Option<String> {
    let db_err = err.as_database_error()?;
    if !db_err.is_unique_violation() {
        return None;
    }
    db_err.constraint().map(str::to_string)
}
