/// The single error type surfaced by [`Invoker::invoke`](crate::Invoker::invoke).
///
/// Variants carry messages, never the library error that caused them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    /// Method and body schema disagree in a checked endpoint definition.
    #[error("invalid endpoint definition: {0}")]
    InvalidDefinition(String),

    /// The route could not build a URL from the given params.
    #[error("cannot build request URL: {0}")]
    Route(String),

    /// The request body failed schema validation before dispatch.
    #[error("request body validation failed: {0}")]
    RequestValidation(String),

    /// The server answered with a 4xx status.
    #[error("Request failed: {status} {status_text}")]
    Client { status: u16, status_text: String },

    /// The server answered with a 5xx status.
    #[error("Server error: {status} {status_text}")]
    Server { status: u16, status_text: String },

    /// Network failure, timeout, or an unreadable response payload.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response payload failed schema validation.
    #[error("response validation failed: {0}")]
    ResponseValidation(String),

    /// The caller's cancellation token fired before a response arrived.
    #[error("request cancelled")]
    Cancelled,

    /// Any other failure.
    #[error("unknown error: {0}")]
    Unknown(String),
}

impl EndpointError {
    /// HTTP status for client and server errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            EndpointError::Client { status, .. } | EndpointError::Server { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// True for request and response schema failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EndpointError::RequestValidation(_) | EndpointError::ResponseValidation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EndpointError>;

/// A method name that is not one of the nine standard HTTP methods.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported HTTP method: {0}")]
pub struct ParseMethodError(pub String);

/// Errors reported by [`Transport`](crate::Transport) implementations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be built (bad URL, header or method).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Connection, TLS or protocol failure.
    #[error("network error: {0}")]
    Network(String),

    /// The request did not complete in time.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The response body could not be read or decoded.
    #[error("malformed response body: {0}")]
    MalformedBody(String),
}
