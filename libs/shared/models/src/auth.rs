use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StoreError;

/// Fixed storage key the login flow writes the bearer token under.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Opaque bearer token proving the current user's identity.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value for an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

// Keep tokens out of logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Credential {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Process-wide credential storage. The request pipeline only reads from it;
/// the login flow is the writer, and must see a failed write.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Option<Credential>;
    fn set(&self, credential: Credential) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}
