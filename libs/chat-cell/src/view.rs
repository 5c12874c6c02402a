// libs/chat-cell/src/view.rs
use tracing::debug;

use shared_models::Credential;
use video_session_cell::{SessionController, SessionError, VideoSession};

use crate::models::Message;

/// State behind one open chat screen: the selected conversation, the
/// pending input, and the video call started from it.
///
/// Dropping the view detaches its session, so a room request still in
/// flight cannot activate a call nobody is looking at.
pub struct ChatView {
    partner: Option<String>,
    messages: Option<Vec<Message>>,
    input: String,
    session: SessionController,
}

impl ChatView {
    pub fn new(session: SessionController) -> Self {
        Self {
            partner: None,
            messages: None,
            input: String::new(),
            session,
        }
    }

    pub fn open_conversation(&mut self, partner: impl Into<String>, messages: Vec<Message>) {
        self.partner = Some(partner.into());
        self.messages = Some(messages);
    }

    /// `false` while the "Select conversation" placeholder is shown.
    pub fn has_conversation(&self) -> bool {
        self.messages.is_some()
    }

    pub fn partner(&self) -> Option<&str> {
        self.partner.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        self.messages.as_deref().unwrap_or_default()
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub async fn start_video_call(&self) -> Result<VideoSession, SessionError> {
        self.session.start().await
    }

    pub fn close_video_call(&self) -> bool {
        self.session.finish()
    }

    /// Token for the call surface, present only while a call is active.
    pub fn session_surface(&self) -> Option<Credential> {
        self.session.snapshot().credential().cloned()
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Take the pending input for sending. Empty input is swallowed.
    pub fn submit_input(&mut self) -> Option<String> {
        let text = std::mem::take(&mut self.input);
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl Drop for ChatView {
    fn drop(&mut self) {
        debug!("Chat view closed, detaching video session");
        self.session.detach();
    }
}
