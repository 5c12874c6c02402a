use std::env;
use std::path::PathBuf;
use tracing::warn;
use uuid::Uuid;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_VIDEO_ROOM_ID: &str = "0b3a56ce-a7dc-4cff-9588-697db5ff6fe4";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub video_room_id: Uuid,
    pub credential_store_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("API_BASE_URL not set, using default {}", DEFAULT_API_BASE_URL);
                    DEFAULT_API_BASE_URL.to_string()
                }),
            video_room_id: match env::var("VIDEO_ROOM_ID") {
                Ok(raw) => Uuid::parse_str(raw.trim()).unwrap_or_else(|e| {
                    warn!("VIDEO_ROOM_ID is not a valid UUID ({}), using default", e);
                    default_room_id()
                }),
                Err(_) => {
                    warn!("VIDEO_ROOM_ID not set, using default");
                    default_room_id()
                }
            },
            credential_store_path: env::var("CREDENTIAL_STORE_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - API base URL is empty");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.trim().is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            video_room_id: default_room_id(),
            credential_store_path: None,
        }
    }
}

fn default_room_id() -> Uuid {
    Uuid::parse_str(DEFAULT_VIDEO_ROOM_ID).unwrap_or_else(|_| Uuid::nil())
}
