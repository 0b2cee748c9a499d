use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::error::TransportError;
use crate::method::Method;

/// A fully built request handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Serialized JSON payload; `None` for body-less methods.
    pub body: Option<String>,
    pub timeout: Option<Duration>,
}

impl TransportRequest {
    /// Value of the first header named `name`, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A response as seen by the invoker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// The transport's own success flag.
    pub ok: bool,
    pub status: u16,
    pub status_text: String,
    pub body: Bytes,
}

impl TransportResponse {
    /// Build a response whose `ok` flag is derived from a 2xx status.
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            ok: (200..300).contains(&status),
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    /// Decode the body as JSON. An empty body decodes to `null`.
    pub fn json(&self) -> Result<Value, TransportError> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&self.body).map_err(|err| TransportError::MalformedBody(err.to_string()))
    }
}

/// Sends requests over the network. Implementations must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
