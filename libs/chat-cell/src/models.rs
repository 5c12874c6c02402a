use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// One line of a conversation as displayed. Read-only for this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    #[serde(rename = "message", default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
    #[serde(rename = "partner", default)]
    pub is_from_partner: bool,
}

impl Message {
    pub fn has_content(&self) -> bool {
        self.body.as_deref().is_some_and(|b| !b.is_empty())
            || self.attachment.as_deref().is_some_and(|a| !a.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoom {
    pub id: Uuid,
    #[serde(default)]
    pub participants: Vec<Uuid>,
    #[serde(default, alias = "unreadCount")]
    pub unread: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest<'a> {
    pub room_id: Uuid,
    pub message: &'a str,
}

/// Either a Spring-style page (`{"content": [...]}`) or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Page { content: Vec<T> },
    Items(Vec<T>),
}

impl<T> Listing<T> {
    pub(crate) fn into_items(self) -> Vec<T> {
        match self {
            Listing::Page { content } => content,
            Listing::Items(items) => items,
        }
    }
}
