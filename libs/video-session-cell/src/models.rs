use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::{Credential, RequestError};

// ==============================================================================
// SESSION STATE
// ==============================================================================

/// Lifecycle of the video call tied to one chat view.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Active {
        credential: Credential,
        room_id: Uuid,
        started_at: DateTime<Utc>,
    },
}

impl SessionState {
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Active { .. })
    }

    pub fn credential(&self) -> Option<&Credential> {
        match self {
            SessionState::Active { credential, .. } => Some(credential),
            SessionState::Idle => None,
        }
    }
}

/// What the embedding view observes: the credential is present exactly
/// when the session is active.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoSession {
    active: bool,
    credential: Option<Credential>,
}

impl VideoSession {
    pub fn idle() -> Self {
        Self {
            active: false,
            credential: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }
}

impl From<&SessionState> for VideoSession {
    fn from(state: &SessionState) -> Self {
        match state {
            SessionState::Idle => Self::idle(),
            SessionState::Active { credential, .. } => Self {
                active: true,
                credential: Some(credential.clone()),
            },
        }
    }
}

// ==============================================================================
// WIRE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub room_id: Uuid,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("A video session is already active")]
    AlreadyActive,

    #[error("A video session is already being started")]
    StartInProgress,

    #[error("The view owning this video session was torn down")]
    Detached,
}
