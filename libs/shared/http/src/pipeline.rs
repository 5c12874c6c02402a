use std::sync::Arc;

use http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderMap, HeaderName, HeaderValue, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::{Credential, CredentialStore, RequestError};

use crate::transport::{HttpTransport, OutboundRequest, TransportResponse};

/// Field the video room endpoint returns its session token under.
pub const TOKEN_FIELD: &str = "token";

pub type CallOutcome = Result<Value, RequestError>;

/// How a response body is turned into an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
    /// Decode the body and keep only `field`. The HTTP status is not consulted.
    PayloadExtraction { field: &'static str },
    /// Decode the body; a non-2xx status rejects with the decoded body.
    FullPayload,
}

impl CallMode {
    pub fn extract(field: &'static str) -> Self {
        CallMode::PayloadExtraction { field }
    }
}

/// Description of one outbound call. Built fresh per call.
#[derive(Debug, Clone)]
pub struct CallConfig {
    method: Method,
    target: String,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl CallConfig {
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(target: impl Into<String>) -> Self {
        Self::new(Method::GET, target)
    }

    pub fn post(target: impl Into<String>) -> Self {
        Self::new(Method::POST, target)
    }

    /// Caller header; wins over the pipeline defaults on conflict.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Body that is already JSON text. The pipeline sends it verbatim.
    pub fn body(mut self, json: impl Into<String>) -> Self {
        self.body = Some(json.into());
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

pub struct RequestPipeline {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<dyn CredentialStore>,
}

impl RequestPipeline {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            credentials,
        }
    }

    pub fn from_config(
        config: &AppConfig,
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self::new(config.api_base_url.clone(), transport, credentials)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Currently stored credential, if a login has happened.
    pub fn credential(&self) -> Option<Credential> {
        self.credentials.get().filter(|c| !c.is_empty())
    }

    /// Local precondition for authenticated operations. Never touches the network.
    pub fn ensure_authenticated(&self) -> Result<Credential, RequestError> {
        self.credential().ok_or(RequestError::AuthenticationMissing)
    }

    pub async fn execute(&self, config: CallConfig, mode: CallMode) -> CallOutcome {
        let url = self.resolve_target(&config.target)?;
        let headers = self.build_headers(&config.headers)?;

        debug!("Making {} request to {}", config.method, url);

        let response = self
            .transport
            .send(OutboundRequest {
                method: config.method,
                url,
                headers,
                body: config.body,
            })
            .await?;

        decode_response(response, mode)
    }

    /// [`execute`](Self::execute), then decode the payload into `T`.
    pub async fn execute_as<T>(&self, config: CallConfig, mode: CallMode) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
    {
        let payload = self.execute(config, mode).await?;
        serde_json::from_value(payload)
            .map_err(|e| RequestError::decode(format!("Unexpected payload shape: {}", e)))
    }

    fn resolve_target(&self, target: &str) -> Result<String, RequestError> {
        if target.is_empty() {
            return Err(RequestError::validation("Call target must not be empty"));
        }

        if target.starts_with("http://") || target.starts_with("https://") {
            return Ok(target.to_string());
        }

        if target.starts_with('/') {
            return Ok(format!("{}{}", self.base_url.trim_end_matches('/'), target));
        }

        Err(RequestError::validation(format!(
            "Call target must be absolute or start with '/': {}",
            target
        )))
    }

    fn build_headers(&self, overrides: &[(String, String)]) -> Result<HeaderMap, RequestError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(credential) = self.credential() {
            let mut value = HeaderValue::from_str(&credential.bearer()).map_err(|_| {
                RequestError::validation("Stored credential is not a valid header value")
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        for (name, value) in overrides {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| RequestError::validation(format!("Invalid header name: {}", name)))?;
            let value = HeaderValue::from_str(value).map_err(|_| {
                RequestError::validation(format!("Invalid value for header {}", name))
            })?;
            headers.insert(name, value);
        }

        Ok(headers)
    }
}

fn decode_response(response: TransportResponse, mode: CallMode) -> CallOutcome {
    let status = response.status;
    let payload: Value = serde_json::from_str(&response.body).map_err(|e| {
        RequestError::decode(format!("Response body ({}) is not valid JSON: {}", status, e))
    })?;

    match mode {
        CallMode::PayloadExtraction { field } => match payload.get(field) {
            Some(value) if !value.is_null() => Ok(value.clone()),
            _ => Err(RequestError::decode(format!(
                "Response body ({}) has no `{}` field",
                status, field
            ))),
        },
        CallMode::FullPayload => {
            if status.is_success() {
                Ok(payload)
            } else {
                error!("API error ({}): {}", status, payload);
                Err(RequestError::Server {
                    status: status.as_u16(),
                    body: payload,
                })
            }
        }
    }
}
