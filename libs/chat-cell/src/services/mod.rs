pub mod chat;

pub use chat::{ChatClient, CHAT_MESSAGE_PATH, CHAT_POLL_PATH, CHAT_ROOM_PATH};
