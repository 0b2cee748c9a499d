use routeprims_schema::SchemaError;

/// Errors raised by route registration, URL construction and parameter reads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// Routes must be registered under a non-empty name.
    #[error("route name must not be empty")]
    EmptyName,

    /// A route with this name is already registered.
    #[error("Route with name {0} already exists")]
    AlreadyExists(String),

    /// The registry reached its configured route limit.
    #[error("route registry is full ({max} routes)")]
    CapacityExceeded { max: usize },

    /// The base URL of an external route is not an absolute http(s) URL.
    #[error("invalid base URL for route {route}: {message}")]
    InvalidBaseUrl { route: String, message: String },

    /// A parameter schema could not be compiled.
    #[error("invalid schema for route {route}: {source}")]
    Schema { route: String, source: SchemaError },

    /// The generated path could not be resolved against the base URL.
    #[error("cannot resolve path {path:?} for route {route}: {message}")]
    InvalidPath {
        route: String,
        path: String,
        message: String,
    },

    /// Search parameters could not be encoded as a query string.
    #[error("cannot encode search params for route {route}: {source}")]
    InvalidSearch { route: String, source: QueryError },

    /// Path parameters from the navigation context failed validation.
    #[error("Invalid params for route {route}: {source}")]
    InvalidParams { route: String, source: SchemaError },

    /// Query parameters from the navigation context failed validation.
    #[error("Invalid search params for route {route}: {source}")]
    InvalidSearchParams { route: String, source: SchemaError },
}

impl RouteError {
    /// Name of the route the error refers to, if any.
    pub fn route(&self) -> Option<&str> {
        match self {
            RouteError::EmptyName | RouteError::CapacityExceeded { .. } => None,
            RouteError::AlreadyExists(route)
            | RouteError::InvalidBaseUrl { route, .. }
            | RouteError::Schema { route, .. }
            | RouteError::InvalidPath { route, .. }
            | RouteError::InvalidSearch { route, .. }
            | RouteError::InvalidParams { route, .. }
            | RouteError::InvalidSearchParams { route, .. } => Some(route),
        }
    }
}

pub type Result<T> = std::result::Result<T, RouteError>;

/// Errors from encoding search params as a query string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Only JSON objects map onto `key=value` pairs.
    #[error("search params must be an object, got {0}")]
    NotAnObject(&'static str),

    /// The search value could not be serialized to JSON.
    #[error("search params could not be serialized: {0}")]
    Serialize(String),
}
