// libs/video-session-cell/src/services/room.rs
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_http::{CallConfig, CallMode, RequestPipeline, TOKEN_FIELD};
use shared_models::{Credential, RequestError};

use crate::models::CreateRoomRequest;

pub const VIDEO_ROOM_PATH: &str = "/api/video/room";

/// Client for the room endpoint that hands out video session tokens.
#[derive(Clone)]
pub struct VideoRoomService {
    pipeline: Arc<RequestPipeline>,
    room_id: Uuid,
}

impl VideoRoomService {
    pub fn new(pipeline: Arc<RequestPipeline>, room_id: Uuid) -> Self {
        Self { pipeline, room_id }
    }

    pub fn from_config(pipeline: Arc<RequestPipeline>, config: &AppConfig) -> Self {
        Self::new(pipeline, config.video_room_id)
    }

    pub fn room_id(&self) -> Uuid {
        self.room_id
    }

    /// Create (or join) the room and return the session token.
    /// POST /api/video/room
    pub async fn create_room(&self) -> Result<Credential, RequestError> {
        info!("Requesting video room {}", self.room_id);

        let body = serde_json::to_string(&CreateRoomRequest { room_id: self.room_id })?;
        let token = self
            .pipeline
            .execute(
                CallConfig::post(VIDEO_ROOM_PATH).body(body),
                CallMode::extract(TOKEN_FIELD),
            )
            .await?;

        match token {
            Value::String(token) if !token.is_empty() => {
                debug!("Received video token for room {}", self.room_id);
                Ok(Credential::new(token))
            }
            other => Err(RequestError::decode(format!(
                "Expected a non-empty string token, got {}",
                other
            ))),
        }
    }
}
