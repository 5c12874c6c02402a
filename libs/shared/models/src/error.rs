use serde_json::Value;
use thiserror::Error;

/// Coarse classification of a rejected call, for UI branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AuthenticationMissing,
    Transport,
    Decode,
    Server,
    Validation,
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("No access token set.")]
    AuthenticationMissing,

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Server error ({status}): {body}")]
    Server { status: u16, body: Value },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl RequestError {
    pub fn transport(message: impl Into<String>) -> Self {
        RequestError::Transport { message: message.into() }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        RequestError::Decode { message: message.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        RequestError::Validation { message: message.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RequestError::AuthenticationMissing => ErrorKind::AuthenticationMissing,
            RequestError::Transport { .. } => ErrorKind::Transport,
            RequestError::Decode { .. } => ErrorKind::Decode,
            RequestError::Server { .. } => ErrorKind::Server,
            RequestError::Validation { .. } => ErrorKind::Validation,
        }
    }

    /// Decoded error body reported by the server, if any.
    pub fn server_body(&self) -> Option<&Value> {
        match self {
            RequestError::Server { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Failure to persist or remove the stored credential.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Credential storage I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Credential storage encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        StoreError::Io { path: path.into(), source }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        RequestError::transport(err.to_string())
    }
}

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        RequestError::decode(err.to_string())
    }
}
