//! Name-keyed route registry with typed path and query parameters.
//!
//! Routes are registered once, under a unique name, on an explicit
//! [`RouteRegistry`]. Each [`Route`] builds URLs from typed parameters and
//! reads the current navigation context back into typed values through the
//! registry's [`ParamSource`].
//!
//! [`RouteDef::new`] starts out with an untyped (`serde_json::Value`) search
//! type, so `registry.register(RouteDef::new(..))` needs no annotation.
//! Attaching a search schema lets the search type be chosen:
//!
//! ```ignore
//! let posts: Route<PostParams, PostSearch> = registry.register(
//!     RouteDef::new("posts", |p: &PostParams| format!("/posts/{}", p.slug))
//!         .search_schema(search_schema),
//! )?;
//! ```
//!
//! External routes resolve paths below their base URL: a base of
//! `https://api.example.com/v1/` and a path of `/users` give
//! `https://api.example.com/v1/users`. A path that would leave the base's
//! origin fails with [`RouteError::InvalidPath`].

pub mod config;
pub mod error;
pub mod query;
pub mod registry;
pub mod route;
pub mod source;

pub use config::RegistryConfig;
pub use error::{QueryError, Result, RouteError};
pub use query::{encode_query, parse_query};
pub use registry::{RouteInfo, RouteRegistry};
pub use route::{NoParams, ParamsOf, Route, RouteDef, RouteTypes, SearchOf, UrlMode};
pub use source::{NavigationContext, ParamSource, QueryValue, StaticParamSource};
