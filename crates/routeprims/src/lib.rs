//! Type-safe route registry and schema-validated HTTP endpoints.
//!
//! Routes are registered once under a unique name and carry schemas for their
//! path and query parameters. Endpoints bind an HTTP method and response
//! schema to a route and are called through an injected transport.
//!
//! # Crate Structure
//!
//! - [`schema`]: JSON Schema wrappers with typed parsing
//! - [`route`]: Route registry, URL building and parameter reads
//! - [`endpoint`]: Endpoint definitions and the invoker (behind `endpoint` feature)
//! - [`logging`]: `tracing-subscriber` setup (behind `logging` feature)

/// Re-export schema types.
pub mod schema {
    pub use routeprims_schema::*;
}

/// Re-export route types.
pub mod route {
    pub use routeprims_route::*;
}

/// Re-export endpoint types (requires `endpoint` feature).
#[cfg(feature = "endpoint")]
pub mod endpoint {
    pub use routeprims_endpoint::*;
}

#[cfg(feature = "logging")]
pub mod logging;
