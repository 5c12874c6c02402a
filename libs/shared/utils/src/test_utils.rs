use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http::{Method, StatusCode};
use serde_json::{json, Value};
use tokio::sync::Semaphore;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_http::{HttpTransport, OutboundRequest, RequestPipeline, TransportResponse};
use shared_models::{Credential, CredentialStore, RequestError};

use crate::credential_store::MemoryCredentialStore;

pub struct TestConfig {
    pub api_base_url: String,
    pub video_room_id: Uuid,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://api.test".to_string(),
            video_room_id: Uuid::new_v4(),
        }
    }
}

impl TestConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.api_base_url.clone(),
            video_room_id: self.video_room_id,
            credential_store_path: None,
        }
    }

    /// Pipeline over `transport` with a memory store holding `token`, if any.
    pub fn pipeline(
        &self,
        transport: Arc<dyn HttpTransport>,
        token: Option<&str>,
    ) -> (Arc<RequestPipeline>, Arc<MemoryCredentialStore>) {
        let store = Arc::new(match token {
            Some(token) => MemoryCredentialStore::with_credential(token),
            None => MemoryCredentialStore::new(),
        });
        let pipeline = RequestPipeline::from_config(
            &self.to_app_config(),
            transport,
            store.clone() as Arc<dyn CredentialStore>,
        );
        (Arc::new(pipeline), store)
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Fixed { status: StatusCode, body: String },
    Echo { status: StatusCode },
    Fail { message: String },
}

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    path: String,
    reply: Reply,
}

/// Scripted in-process transport. Requests are matched on method and URL
/// path suffix; unmatched requests get a 404 JSON body.
#[derive(Default)]
pub struct RecordingTransport {
    routes: Mutex<Vec<Route>>,
    fallback: Mutex<Option<Reply>>,
    requests: Mutex<Vec<OutboundRequest>>,
    gate: Option<Arc<Semaphore>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails at the connection level.
    pub fn failing(message: &str) -> Self {
        let transport = Self::new();
        *lock(&transport.fallback) = Some(Reply::Fail {
            message: message.to_string(),
        });
        transport
    }

    /// Responses are held until [`release`](Self::release) hands out permits.
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::default()
        }
    }

    pub fn respond(self, method: Method, path: &str, status: u16, body: Value) -> Self {
        self.route(method, path, Reply::Fixed {
            status: status_code(status),
            body: body.to_string(),
        })
    }

    pub fn respond_raw(self, method: Method, path: &str, status: u16, body: &str) -> Self {
        self.route(method, path, Reply::Fixed {
            status: status_code(status),
            body: body.to_string(),
        })
    }

    /// Replies with the request body unchanged.
    pub fn echo(self, method: Method, path: &str, status: u16) -> Self {
        self.route(method, path, Reply::Echo {
            status: status_code(status),
        })
    }

    pub fn fail(self, method: Method, path: &str, message: &str) -> Self {
        self.route(method, path, Reply::Fail {
            message: message.to_string(),
        })
    }

    pub fn release(&self, permits: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(permits);
        }
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        lock(&self.requests).clone()
    }

    pub fn last_request(&self) -> Option<OutboundRequest> {
        lock(&self.requests).last().cloned()
    }

    fn route(self, method: Method, path: &str, reply: Reply) -> Self {
        lock(&self.routes).push(Route {
            method,
            path: path.to_string(),
            reply,
        });
        self
    }

    fn reply_for(&self, request: &OutboundRequest) -> Reply {
        let path = request.url.split('?').next().unwrap_or_default();
        lock(&self.routes)
            .iter()
            .rev()
            .find(|r| r.method == request.method && path.ends_with(&r.path))
            .map(|r| r.reply.clone())
            .or_else(|| lock(&self.fallback).clone())
            .unwrap_or(Reply::Fixed {
                status: StatusCode::NOT_FOUND,
                body: json!({"error": "not found"}).to_string(),
            })
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, RequestError> {
        let reply = self.reply_for(&request);
        lock(&self.requests).push(request.clone());

        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        match reply {
            Reply::Fixed { status, body } => Ok(TransportResponse::new(status, body)),
            Reply::Echo { status } => Ok(TransportResponse::new(status, request.body.unwrap_or_default())),
            Reply::Fail { message } => Err(RequestError::transport(message)),
        }
    }
}

pub fn test_credential() -> Credential {
    Credential::new("test-access-token")
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
