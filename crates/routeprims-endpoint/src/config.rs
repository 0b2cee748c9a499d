/// Default maximum response body size: 16 MiB.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;

/// Controls request construction and response handling in the invoker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokerConfig {
    /// Headers sent with every request, before per-request headers.
    pub default_headers: Vec<(String, String)>,
    /// Responses with larger bodies fail as transport errors.
    pub max_response_bytes: usize,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            default_headers: vec![("accept".to_string(), "application/json".to_string())],
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}
