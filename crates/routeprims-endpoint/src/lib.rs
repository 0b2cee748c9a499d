//! Typed HTTP endpoint invocation with schema-validated bodies and responses.
//!
//! An [`Endpoint`] pairs an HTTP method, a [`Route`](routeprims_route::Route)
//! and the schemas for its request body and response. The [`Invoker`] turns a
//! call into exactly one [`Transport`] request and normalizes every failure
//! into an [`EndpointError`].

pub mod config;
pub mod endpoint;
pub mod error;
pub mod invoker;
pub mod method;
pub mod transport;

#[cfg(feature = "reqwest")]
pub mod reqwest_transport;

pub use config::InvokerConfig;
pub use endpoint::{Endpoint, EndpointMethod, EndpointRequest, RequestOptions};
pub use error::{EndpointError, ParseMethodError, Result, TransportError};
pub use invoker::Invoker;
pub use method::{BodyMethod, BodylessMethod, Method, MethodClass};
pub use transport::{Transport, TransportRequest, TransportResponse};

#[cfg(feature = "reqwest")]
pub use reqwest_transport::ReqwestTransport;
