//! [`Transport`] backed by a `reqwest::Client`.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::config::DEFAULT_MAX_RESPONSE_BYTES;
use crate::error::TransportError;
use crate::transport::{Transport, TransportRequest, TransportResponse};

/// Sends requests with a shared `reqwest::Client`.
///
/// Bodies are read in chunks and the read stops once `max_response_bytes`
/// is exceeded.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    max_response_bytes: usize,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }

    pub fn with_max_response_bytes(mut self, max: usize) -> Self {
        self.max_response_bytes = max;
        self
    }

    pub fn max_response_bytes(&self) -> usize {
        self.max_response_bytes
    }

    async fn read_body(&self, mut response: reqwest::Response) -> Result<Bytes, TransportError> {
        if let Some(length) = response.content_length() {
            if length > self.max_response_bytes as u64 {
                return Err(too_large(self.max_response_bytes));
            }
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await.map_err(map_error)? {
            if body.len() + chunk.len() > self.max_response_bytes {
                return Err(too_large(self.max_response_bytes));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body.freeze())
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|err| TransportError::InvalidRequest(err.to_string()))?;

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_error)?;
        let status = response.status();
        trace!(url = %request.url, status = status.as_u16(), "response received");

        let body = self.read_body(response).await?;
        Ok(TransportResponse {
            ok: status.is_success(),
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

fn map_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_builder() {
        TransportError::InvalidRequest(err.to_string())
    } else if err.is_body() || err.is_decode() {
        TransportError::MalformedBody(err.to_string())
    } else {
        TransportError::Network(err.to_string())
    }
}

fn too_large(max: usize) -> TransportError {
    TransportError::MalformedBody(format!("response body exceeds {max} bytes"))
}
