pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::chat;
pub use domain::user;
pub use domain::user_chat;
pub use outbound::repositories;
