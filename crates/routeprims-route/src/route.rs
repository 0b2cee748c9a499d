use std::fmt;
use std::sync::Arc;

use routeprims_schema::{SafeParse, Schema};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{QueryError, Result, RouteError};
use crate::query::encode_query;
use crate::source::{path_params_value, query_params_value, ParamSource};

/// Pure function from typed path parameters to a path string.
pub type PathBuilder<P> = Arc<dyn Fn(&P) -> String + Send + Sync>;

/// Whether a route resolves to a relative path or an absolute URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UrlMode {
    /// Relative path, no host.
    #[default]
    Internal,
    /// Absolute URL: the generated path is appended below `base_url`'s path.
    External { base_url: String },
}

/// Parameters for routes without dynamic segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoParams {}

/// Everything needed to register a route.
///
/// `P` is the path-parameter type, `S` the search-parameter type.
pub struct RouteDef<P, S = Value> {
    pub(crate) name: String,
    pub(crate) path: PathBuilder<P>,
    pub(crate) params_schema: Option<Value>,
    pub(crate) search_schema: Option<Value>,
    pub(crate) url_mode: UrlMode,
    _search: std::marker::PhantomData<fn() -> S>,
}

impl<P> RouteDef<P, Value> {
    /// Start a definition with an untyped search type.
    pub fn new(name: impl Into<String>, path: impl Fn(&P) -> String + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            path: Arc::new(path),
            params_schema: None,
            search_schema: None,
            url_mode: UrlMode::Internal,
            _search: std::marker::PhantomData,
        }
    }
}

impl<P, S> RouteDef<P, S> {

    /// Schema for the path parameters. Defaults to `{}` (accept anything).
    pub fn params_schema(mut self, schema: Value) -> Self {
        self.params_schema = Some(schema);
        self
    }

    /// Schema for the query parameters; `T` is the type reads parse into.
    pub fn search_schema<T>(self, schema: Value) -> RouteDef<P, T> {
        RouteDef {
            name: self.name,
            path: self.path,
            params_schema: self.params_schema,
            search_schema: Some(schema),
            url_mode: self.url_mode,
            _search: std::marker::PhantomData,
        }
    }

    pub fn url_mode(mut self, mode: UrlMode) -> Self {
        self.url_mode = mode;
        self
    }

    /// Shorthand for `url_mode(UrlMode::External { base_url })`.
    pub fn external(self, base_url: impl Into<String>) -> Self {
        self.url_mode(UrlMode::External {
            base_url: base_url.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<P, S> fmt::Debug for RouteDef<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDef")
            .field("name", &self.name)
            .field("params_schema", &self.params_schema)
            .field("search_schema", &self.search_schema)
            .field("url_mode", &self.url_mode)
            .finish_non_exhaustive()
    }
}

pub(crate) struct RouteInner<P, S> {
    pub(crate) name: String,
    pub(crate) path: PathBuilder<P>,
    pub(crate) params_schema: Schema<P>,
    pub(crate) search_schema: Schema<S>,
    pub(crate) has_search_schema: bool,
    pub(crate) base_url: Option<Url>,
    pub(crate) source: Arc<dyn ParamSource>,
}

/// A registered, named route.
///
/// Cloning shares the same descriptor.
pub struct Route<P, S = Value> {
    inner: Arc<RouteInner<P, S>>,
}

impl<P, S> Route<P, S> {
    pub(crate) fn from_inner(inner: RouteInner<P, S>) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// The name the route was registered under.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Base URL for external routes.
    pub fn base_url(&self) -> Option<&Url> {
        self.inner.base_url.as_ref()
    }

    pub fn is_external(&self) -> bool {
        self.inner.base_url.is_some()
    }

    pub fn has_search_schema(&self) -> bool {
        self.inner.has_search_schema
    }

    pub fn params_schema(&self) -> &Schema<P> {
        &self.inner.params_schema
    }

    pub fn search_schema(&self) -> &Schema<S> {
        &self.inner.search_schema
    }

    /// Output of the path builder, without base URL or query.
    pub fn path(&self, params: &P) -> String {
        (self.inner.path)(params)
    }

    /// Build the URL for `params`: relative for internal routes, absolute
    /// for external ones.
    pub fn url(&self, params: &P) -> Result<String> {
        self.build(params, None)
    }

    /// Build the URL for `params` and append `search` as a query string.
    pub fn url_with_search(&self, params: &P, search: &S) -> Result<String>
    where
        S: Serialize,
    {
        let search = serde_json::to_value(search).map_err(|err| RouteError::InvalidSearch {
            route: self.inner.name.clone(),
            source: QueryError::Serialize(err.to_string()),
        })?;
        self.build(params, Some(&search))
    }

    fn build(&self, params: &P, search: Option<&Value>) -> Result<String> {
        let path = self.path(params);
        let mut url = match &self.inner.base_url {
            None => path,
            Some(base) => self.resolve(base, &path)?,
        };

        if let Some(search) = search {
            let query = encode_query(search).map_err(|source| RouteError::InvalidSearch {
                route: self.inner.name.clone(),
                source,
            })?;
            if !query.is_empty() {
                url.push('?');
                url.push_str(&query);
            }
        }
        Ok(url)
    }

    /// Resolve `path` below `base`, keeping the base path as a prefix.
    ///
    /// `base` always ends in `/` (see registration), so joining the path
    /// without its leading slashes appends it. The result must keep the
    /// base's origin.
    fn resolve(&self, base: &Url, path: &str) -> Result<String> {
        let invalid = |message: String| RouteError::InvalidPath {
            route: self.inner.name.clone(),
            path: path.to_string(),
            message,
        };

        let resolved = base
            .join(path.trim_start_matches('/'))
            .map_err(|err| invalid(err.to_string()))?;
        if resolved.origin() != base.origin() {
            return Err(invalid(format!(
                "resolves outside {}",
                base.origin().ascii_serialization()
            )));
        }
        Ok(resolved.to_string())
    }

    /// Read and validate the path parameters of the current location.
    pub fn use_params(&self) -> Result<P>
    where
        P: DeserializeOwned,
    {
        let raw = path_params_value(self.inner.source.path_params());
        match self.inner.params_schema.safe_parse(&raw) {
            SafeParse::Success(params) => Ok(params),
            SafeParse::Failure(source) => Err(RouteError::InvalidParams {
                route: self.inner.name.clone(),
                source,
            }),
        }
    }

    /// Read and validate the query parameters of the current location.
    pub fn use_search_params(&self) -> Result<S>
    where
        S: DeserializeOwned,
    {
        let raw = query_params_value(&self.inner.source.query_params());
        match self.inner.search_schema.safe_parse(&raw) {
            SafeParse::Success(search) => Ok(search),
            SafeParse::Failure(source) => Err(RouteError::InvalidSearchParams {
                route: self.inner.name.clone(),
                source,
            }),
        }
    }
}

impl<P, S> Clone for Route<P, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P, S> fmt::Debug for Route<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.inner.name)
            .field("base_url", &self.inner.base_url)
            .field("has_search_schema", &self.inner.has_search_schema)
            .finish_non_exhaustive()
    }
}

/// Compile-time access to a route's parameter types.
///
/// ```ignore
/// fn render(params: ParamsOf<Route<UserParams>>) { /* ... */ }
/// ```
pub trait RouteTypes {
    type Params;
    type Search;
}

impl<P, S> RouteTypes for Route<P, S> {
    type Params = P;
    type Search = S;
}

/// Path-parameter type of a route.
pub type ParamsOf<R> = <R as RouteTypes>::Params;

/// Search-parameter type of a route.
pub type SearchOf<R> = <R as RouteTypes>::Search;
