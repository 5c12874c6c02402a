// libs/chat-cell/src/services/chat.rs
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use shared_http::{CallConfig, CallMode, RequestPipeline};
use shared_models::RequestError;

use crate::models::{ChatRoom, Listing, Message, SendMessageRequest};

pub const CHAT_ROOM_PATH: &str = "/api/chat/room";
pub const CHAT_MESSAGE_PATH: &str = "/api/chat/message";
pub const CHAT_POLL_PATH: &str = "/api/chat/poll";

/// Client for the conversation endpoints. Same credential precondition as
/// the rest of the authenticated API.
pub struct ChatClient {
    pipeline: Arc<RequestPipeline>,
}

impl ChatClient {
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self { pipeline }
    }

    /// GET /api/chat/room
    pub async fn load_rooms(&self) -> Result<Vec<ChatRoom>, RequestError> {
        self.fetch_listing(CallConfig::get(CHAT_ROOM_PATH)).await
    }

    /// POST /api/chat/room. The server adds the caller to `participants`.
    pub async fn create_room(&self, participants: &[Uuid]) -> Result<ChatRoom, RequestError> {
        self.pipeline.ensure_authenticated()?;
        let body = serde_json::to_string(participants)
            .map_err(|e| RequestError::validation(format!("Participants not encodable: {}", e)))?;

        self.pipeline
            .execute_as(CallConfig::post(CHAT_ROOM_PATH).body(body), CallMode::FullPayload)
            .await
    }

    /// POST /api/chat/message
    pub async fn send_message(&self, room_id: Uuid, text: &str) -> Result<Message, RequestError> {
        self.pipeline.ensure_authenticated()?;
        if text.trim().is_empty() {
            return Err(RequestError::validation("Message must not be empty"));
        }

        debug!("Sending message to room {}", room_id);
        let body = serde_json::to_string(&SendMessageRequest { room_id, message: text })
            .map_err(|e| RequestError::validation(format!("Message not encodable: {}", e)))?;

        self.pipeline
            .execute_as(CallConfig::post(CHAT_MESSAGE_PATH).body(body), CallMode::FullPayload)
            .await
    }

    /// GET /api/chat/room/{roomId}
    pub async fn load_messages(&self, room_id: Uuid) -> Result<Vec<Message>, RequestError> {
        self.fetch_listing(CallConfig::get(format!("{}/{}", CHAT_ROOM_PATH, room_id)))
            .await
    }

    /// GET /api/chat/poll. Rooms with activity since the previous fetch.
    pub async fn poll(&self) -> Result<Vec<ChatRoom>, RequestError> {
        self.fetch_listing(CallConfig::get(CHAT_POLL_PATH)).await
    }

    /// POST /api/chat/room/{roomId}
    pub async fn mark_as_read(&self, room_id: Uuid) -> Result<ChatRoom, RequestError> {
        self.pipeline.ensure_authenticated()?;
        self.pipeline
            .execute_as(
                CallConfig::post(format!("{}/{}", CHAT_ROOM_PATH, room_id)),
                CallMode::FullPayload,
            )
            .await
    }

    async fn fetch_listing<T>(&self, config: CallConfig) -> Result<Vec<T>, RequestError>
    where
        T: DeserializeOwned,
    {
        self.pipeline.ensure_authenticated()?;
        let listing: Listing<T> = self.pipeline.execute_as(config, CallMode::FullPayload).await?;
        Ok(listing.into_items())
    }
}
