use std::sync::Arc;

use routeprims_schema::Schema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::InvokerConfig;
use crate::endpoint::{Endpoint, EndpointMethod, EndpointRequest};
use crate::error::{EndpointError, Result};
use crate::transport::{Transport, TransportRequest, TransportResponse};

const CONTENT_TYPE: &str = "content-type";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Calls endpoints over an injected [`Transport`].
///
/// Every call makes exactly one transport request. Nothing is retried or cached.
#[derive(Clone)]
pub struct Invoker {
    transport: Arc<dyn Transport>,
    config: InvokerConfig,
}

impl Invoker {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_config(transport, InvokerConfig::default())
    }

    pub fn with_config(transport: Arc<dyn Transport>, config: InvokerConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }

    /// Call `endpoint` and return its validated response.
    ///
    /// For body-bearing methods the body is validated and serialized; a
    /// missing body is validated as `null`. For other methods any supplied
    /// body is dropped.
    pub async fn invoke<P, S, B, R>(
        &self,
        endpoint: &Endpoint<P, S, B, R>,
        request: EndpointRequest<P, B>,
    ) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let EndpointRequest {
            params,
            body,
            options,
        } = request;
        let route = endpoint.route();

        let url = route
            .url(&params)
            .map_err(|err| EndpointError::Route(err.to_string()))?;

        let payload = match endpoint.endpoint_method() {
            EndpointMethod::WithBody { schema, .. } => Some(encode_body(schema, body.as_ref())?),
            EndpointMethod::WithoutBody(method) => {
                if body.is_some() {
                    warn!(
                        route = route.name(),
                        method = %crate::Method::from(*method),
                        "ignoring request body for body-less method"
                    );
                }
                None
            }
        };

        let mut headers = merge_headers(&self.config.default_headers, options.headers);
        if payload.is_some()
            && !headers
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE))
        {
            headers.push((CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string()));
        }

        let transport_request = TransportRequest {
            method: endpoint.method(),
            url,
            headers,
            body: payload,
            timeout: options.timeout,
        };
        debug!(
            route = route.name(),
            method = %transport_request.method,
            url = %transport_request.url,
            "dispatching request"
        );

        let sent = self.transport.send(transport_request);
        let response = match options.cancellation {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(EndpointError::Cancelled),
                response = sent => response,
            },
            None => sent.await,
        }
        .map_err(|err| EndpointError::Transport(err.to_string()))?;

        classify_status(&response)?;
        if response.body.len() > self.config.max_response_bytes {
            return Err(EndpointError::Transport(format!(
                "response body too large ({} bytes, max {})",
                response.body.len(),
                self.config.max_response_bytes
            )));
        }

        let payload = response
            .json()
            .map_err(|err| EndpointError::Transport(err.to_string()))?;
        endpoint
            .response_schema()
            .parse(&payload)
            .map_err(|err| EndpointError::ResponseValidation(err.to_string()))
    }
}

impl std::fmt::Debug for Invoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invoker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Defaults first, minus any header the caller sets (names compared
/// ignoring ASCII case).
fn merge_headers(
    defaults: &[(String, String)],
    overrides: Vec<(String, String)>,
) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = defaults
        .iter()
        .filter(|(name, _)| {
            !overrides
                .iter()
                .any(|(other, _)| other.eq_ignore_ascii_case(name))
        })
        .cloned()
        .collect();
    headers.extend(overrides);
    headers
}

fn encode_body<B: Serialize>(schema: &Schema<B>, body: Option<&B>) -> Result<String> {
    let value = match body {
        Some(body) => serde_json::to_value(body)
            .map_err(|err| EndpointError::RequestValidation(err.to_string()))?,
        None => Value::Null,
    };
    let checked = schema
        .check(&value)
        .map_err(|err| EndpointError::RequestValidation(err.to_string()))?;
    serde_json::to_string(&checked).map_err(|err| EndpointError::Unknown(err.to_string()))
}

fn classify_status(response: &TransportResponse) -> Result<()> {
    if response.ok {
        return Ok(());
    }

    let status = response.status;
    let status_text = response.status_text.clone();
    warn!(status, status_text = %status_text, "request failed");
    match status {
        400..=499 => Err(EndpointError::Client {
            status,
            status_text,
        }),
        500..=599 => Err(EndpointError::Server {
            status,
            status_text,
        }),
        _ => Err(EndpointError::Unknown(format!(
            "unexpected status {status} {status_text}"
        ))),
    }
}
