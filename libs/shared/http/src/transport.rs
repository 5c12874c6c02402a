use async_trait::async_trait;
use http::{HeaderMap, Method, StatusCode};
use reqwest::Client;
use tracing::debug;

use shared_models::RequestError;

/// A fully resolved call, ready to hand to the network.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Network seam of the pipeline. Implementations report connection-level
/// failures as [`RequestError::Transport`] and never inspect the status.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, RequestError>;
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, RequestError> {
        let mut req = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            req = req.body(body);
        }

        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!("Transport response: {} ({} bytes)", status, body.len());

        Ok(TransportResponse { status, body })
    }
}
