// libs/chat-cell/src/lib.rs
//! # Chat Cell
//!
//! Conversations between patients and doctors, and the video call that
//! can be started from an open conversation.
//!
//! ```text
//! +-----------------------------------------------------+
//! |  models.rs      |  Message and room read models     |
//! |  services/      |                                   |
//! |    chat.rs      |  /api/chat REST client            |
//! |  view.rs        |  Conversation view + video call   |
//! +-----------------------------------------------------+
//! ```

pub mod models;
pub mod services;
pub mod view;

pub use models::{ChatRoom, Message};
pub use services::ChatClient;
pub use view::ChatView;
