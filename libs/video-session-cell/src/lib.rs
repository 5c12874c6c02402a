// libs/video-session-cell/src/lib.rs
//! # Video Session Cell
//!
//! Starts and ends the video call attached to a chat conversation.
//!
//! ## Architecture
//!
//! ```text
//! +-----------------------------------------------------+
//! |                 Video Session Cell                  |
//! +-----------------------------------------------------+
//! |  models.rs      |  Session state, snapshot, errors  |
//! |  services/      |  Business logic layer             |
//! |    room.rs      |  POST /api/video/room client      |
//! |    session.rs   |  Idle/Active session controller   |
//! +-----------------------------------------------------+
//! ```
//!
//! A session is `Idle` until the room endpoint hands back a token, then
//! `Active` until the user hangs up or the remote side does. The token is
//! held exactly while the session is active.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use shared_config::AppConfig;
//! use shared_http::{ReqwestTransport, RequestPipeline};
//! use shared_models::CredentialStore;
//! use video_session_cell::{SessionController, VideoRoomService};
//!
//! # async fn example(store: Arc<dyn CredentialStore>) -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env();
//! let pipeline = Arc::new(RequestPipeline::from_config(&config, Arc::new(ReqwestTransport::new()), store));
//! let controller = SessionController::new(VideoRoomService::from_config(pipeline, &config));
//!
//! let session = controller.start().await?;
//! assert!(session.is_active());
//! controller.finish();
//! # Ok(())
//! # }
//! ```

pub mod models;
pub mod services;

pub use models::{SessionError, SessionState, VideoSession};
pub use services::{Liveness, SessionController, VideoRoomService};
