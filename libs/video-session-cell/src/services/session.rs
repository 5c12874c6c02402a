// libs/video-session-cell/src/services/session.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tokio::sync::watch;
use tracing::{info, warn};

use shared_models::Credential;

use crate::models::{SessionError, SessionState, VideoSession};
use crate::services::room::VideoRoomService;

/// Shared flag telling in-flight work whether its owner still exists.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn kill(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

struct Inner {
    rooms: VideoRoomService,
    state: Mutex<SessionState>,
    starting: AtomicBool,
    liveness: Liveness,
    updates: watch::Sender<VideoSession>,
}

/// Idle/Active state machine for the video call of one chat view.
///
/// Clones share the same session. State changes are published to
/// [`subscribe`](Self::subscribe) receivers; the view renders from those
/// snapshots instead of owning the state itself.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
}

/// Clears the in-flight marker even when the start future is dropped.
struct StartGuard<'a>(&'a AtomicBool);

impl Drop for StartGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SessionController {
    pub fn new(rooms: VideoRoomService) -> Self {
        let (updates, _) = watch::channel(VideoSession::idle());
        Self {
            inner: Arc::new(Inner {
                rooms,
                state: Mutex::new(SessionState::Idle),
                starting: AtomicBool::new(false),
                liveness: Liveness::new(),
                updates,
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        self.lock_state().clone()
    }

    pub fn snapshot(&self) -> VideoSession {
        VideoSession::from(&*self.lock_state())
    }

    pub fn subscribe(&self) -> watch::Receiver<VideoSession> {
        self.inner.updates.subscribe()
    }

    pub fn liveness(&self) -> Liveness {
        self.inner.liveness.clone()
    }

    pub fn is_attached(&self) -> bool {
        self.inner.liveness.is_alive()
    }

    /// Request a room token and, once it arrives, become `Active`.
    ///
    /// Any pipeline rejection leaves the session `Idle`. A result that
    /// arrives after [`detach`](Self::detach) is discarded.
    pub async fn start(&self) -> Result<VideoSession, SessionError> {
        let _guard = {
            let state = self.lock_state();
            if !self.is_attached() {
                return Err(SessionError::Detached);
            }
            if state.is_active() {
                return Err(SessionError::AlreadyActive);
            }
            if self.inner.starting.swap(true, Ordering::SeqCst) {
                return Err(SessionError::StartInProgress);
            }
            StartGuard(&self.inner.starting)
        };

        let outcome = self.inner.rooms.create_room().await;

        let credential = match outcome {
            Ok(credential) => credential,
            Err(_) if !self.is_attached() => return Err(self.discard_late_result()),
            Err(e) => {
                warn!("Video session not started: {}", e);
                return Err(e.into());
            }
        };

        self.activate(credential)
    }

    /// Publish `Active` unless the view detached meanwhile. Liveness is
    /// checked under the state lock, which [`detach`](Self::detach) also holds.
    fn activate(&self, credential: Credential) -> Result<VideoSession, SessionError> {
        let mut state = self.lock_state();
        if !self.is_attached() {
            return Err(self.discard_late_result());
        }

        *state = SessionState::Active {
            credential,
            room_id: self.inner.rooms.room_id(),
            started_at: Utc::now(),
        };
        let snapshot = self.publish(&state);

        info!("Video session started in room {}", self.inner.rooms.room_id());
        Ok(snapshot)
    }

    /// End the active session. Returns `false` when there was nothing to end.
    pub fn finish(&self) -> bool {
        let ended = self.end_session();
        if ended {
            info!("Video session finished");
        }
        ended
    }

    /// Same transition as [`finish`](Self::finish), triggered by the other party.
    pub fn remote_hangup(&self) -> bool {
        let ended = self.end_session();
        if ended {
            info!("Video session ended by remote hangup");
        }
        ended
    }

    /// Mark the owning view as gone. Pending starts will discard their result.
    pub fn detach(&self) {
        let mut state = self.lock_state();
        self.inner.liveness.kill();
        if state.is_active() {
            *state = SessionState::Idle;
            self.publish(&state);
            info!("Video session ended on detach");
        }
    }

    fn discard_late_result(&self) -> SessionError {
        warn!("Discarding video room result: session view was torn down");
        SessionError::Detached
    }

    fn end_session(&self) -> bool {
        let mut state = self.lock_state();
        if !state.is_active() {
            return false;
        }
        *state = SessionState::Idle;
        self.publish(&state);
        true
    }

    fn publish(&self, state: &SessionState) -> VideoSession {
        let snapshot = VideoSession::from(state);
        self.inner.updates.send_replace(snapshot.clone());
        snapshot
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
