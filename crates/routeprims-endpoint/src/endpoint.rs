use std::fmt;
use std::time::Duration;

use routeprims_route::Route;
use routeprims_schema::Schema;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::{EndpointError, Result};
use crate::method::{BodyMethod, BodylessMethod, Method, MethodClass};

/// An endpoint's method, carrying the body schema only when a body is sent.
pub enum EndpointMethod<B> {
    WithBody { method: BodyMethod, schema: Schema<B> },
    WithoutBody(BodylessMethod),
}

impl<B> EndpointMethod<B> {
    pub fn method(&self) -> Method {
        match self {
            EndpointMethod::WithBody { method, .. } => (*method).into(),
            EndpointMethod::WithoutBody(method) => (*method).into(),
        }
    }

    pub fn class(&self) -> MethodClass {
        match self {
            EndpointMethod::WithBody { .. } => MethodClass::WithBody,
            EndpointMethod::WithoutBody(_) => MethodClass::WithoutBody,
        }
    }

    pub fn body_schema(&self) -> Option<&Schema<B>> {
        match self {
            EndpointMethod::WithBody { schema, .. } => Some(schema),
            EndpointMethod::WithoutBody(_) => None,
        }
    }
}

impl<B> Clone for EndpointMethod<B> {
    fn clone(&self) -> Self {
        match self {
            EndpointMethod::WithBody { method, schema } => EndpointMethod::WithBody {
                method: *method,
                schema: schema.clone(),
            },
            EndpointMethod::WithoutBody(method) => EndpointMethod::WithoutBody(*method),
        }
    }
}

impl<B> fmt::Debug for EndpointMethod<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointMethod::WithBody { method, schema } => f
                .debug_struct("WithBody")
                .field("method", method)
                .field("schema", schema)
                .finish(),
            EndpointMethod::WithoutBody(method) => {
                f.debug_tuple("WithoutBody").field(method).finish()
            }
        }
    }
}

/// A typed HTTP operation: method, target route, body and response schemas.
///
/// `P`/`S` are the route's parameter types, `B` the request body type and
/// `R` the validated response type.
pub struct Endpoint<P, S = Value, B = Value, R = Value> {
    method: EndpointMethod<B>,
    route: Route<P, S>,
    response: Schema<R>,
}

impl<P, S, B, R> Endpoint<P, S, B, R> {
    /// An endpoint whose method sends a validated body.
    pub fn with_body(
        method: BodyMethod,
        route: &Route<P, S>,
        body: Schema<B>,
        response: Schema<R>,
    ) -> Self {
        Self {
            method: EndpointMethod::WithBody {
                method,
                schema: body,
            },
            route: route.clone(),
            response,
        }
    }

    /// An endpoint whose method never sends a body.
    pub fn without_body(method: BodylessMethod, route: &Route<P, S>, response: Schema<R>) -> Self {
        Self {
            method: EndpointMethod::WithoutBody(method),
            route: route.clone(),
            response,
        }
    }

    /// Checked constructor for a method chosen at runtime.
    ///
    /// A body schema is required for POST, PUT and PATCH and rejected for
    /// every other method.
    pub fn new(
        method: Method,
        route: &Route<P, S>,
        body: Option<Schema<B>>,
        response: Schema<R>,
    ) -> Result<Self> {
        match (method.class(), body) {
            (MethodClass::WithBody, Some(body)) => {
                let method = BodyMethod::try_from(method).map_err(|method| {
                    EndpointError::InvalidDefinition(format!("{method} cannot carry a body"))
                })?;
                Ok(Self::with_body(method, route, body, response))
            }
            (MethodClass::WithoutBody, None) => {
                let method = BodylessMethod::try_from(method).map_err(|method| {
                    EndpointError::InvalidDefinition(format!("{method} requires a body"))
                })?;
                Ok(Self::without_body(method, route, response))
            }
            (MethodClass::WithBody, None) => Err(EndpointError::InvalidDefinition(format!(
                "{method} endpoint on route {} requires a body schema",
                route.name()
            ))),
            (MethodClass::WithoutBody, Some(_)) => Err(EndpointError::InvalidDefinition(format!(
                "{method} endpoint on route {} must not declare a body schema",
                route.name()
            ))),
        }
    }

    pub fn method(&self) -> Method {
        self.method.method()
    }

    pub fn endpoint_method(&self) -> &EndpointMethod<B> {
        &self.method
    }

    pub fn route(&self) -> &Route<P, S> {
        &self.route
    }

    pub fn response_schema(&self) -> &Schema<R> {
        &self.response
    }
}

impl<P, S, B, R> Clone for Endpoint<P, S, B, R> {
    fn clone(&self) -> Self {
        Self {
            method: self.method.clone(),
            route: self.route.clone(),
            response: self.response.clone(),
        }
    }
}

impl<P, S, B, R> fmt::Debug for Endpoint<P, S, B, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("method", &self.method)
            .field("route", &self.route)
            .field("response", &self.response)
            .finish()
    }
}

/// Transport-level overrides for one call.
///
/// Method and body are owned by the endpoint and cannot be set here.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
    pub cancellation: Option<CancellationToken>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Caller input for one endpoint call.
#[derive(Debug, Clone)]
pub struct EndpointRequest<P, B = Value> {
    pub params: P,
    pub body: Option<B>,
    pub options: RequestOptions,
}

impl<P, B> EndpointRequest<P, B> {
    pub fn new(params: P) -> Self {
        Self {
            params,
            body: None,
            options: RequestOptions::default(),
        }
    }

    pub fn with_body(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use routeprims_route::{NoParams, RouteDef, RouteRegistry, StaticParamSource};
    use serde_json::json;

    use super::*;

    fn items_route() -> Route<NoParams> {
        let registry = RouteRegistry::new(Arc::new(StaticParamSource::new()));
        registry
            .register(RouteDef::new("items", |_: &NoParams| "/items".to_string()))
            .unwrap()
    }

    fn any_schema() -> Schema<Value> {
        Schema::new(&json!({})).unwrap()
    }

    #[test]
    fn checked_constructor_requires_body_schema_for_body_methods() {
        let route = items_route();
        let endpoint: Result<Endpoint<NoParams>> =
            Endpoint::new(Method::Post, &route, Some(any_schema()), any_schema());
        let endpoint = endpoint.unwrap();
        assert_eq!(endpoint.method(), Method::Post);
        assert_eq!(endpoint.endpoint_method().class(), MethodClass::WithBody);
        assert!(endpoint.endpoint_method().body_schema().is_some());

        let missing: Result<Endpoint<NoParams>> =
            Endpoint::new(Method::Patch, &route, None, any_schema());
        assert!(matches!(missing, Err(EndpointError::InvalidDefinition(_))));
    }

    #[test]
    fn checked_constructor_rejects_body_schema_for_bodyless_methods() {
        let route = items_route();
        let endpoint: Result<Endpoint<NoParams>> =
            Endpoint::new(Method::Get, &route, None, any_schema());
        assert_eq!(endpoint.unwrap().method(), Method::Get);

        let with_schema: Result<Endpoint<NoParams>> =
            Endpoint::new(Method::Delete, &route, Some(any_schema()), any_schema());
        let err = with_schema.unwrap_err();
        assert!(err.to_string().contains("DELETE endpoint on route items"));
    }

    #[test]
    fn endpoint_keeps_route_identity() {
        let route = items_route();
        let endpoint: Endpoint<NoParams> =
            Endpoint::without_body(BodylessMethod::Head, &route, any_schema());
        assert_eq!(endpoint.route().name(), "items");
        assert_eq!(endpoint.clone().method(), Method::Head);
        assert!(endpoint.endpoint_method().body_schema().is_none());
    }

    #[test]
    fn request_options_builder_collects_overrides() {
        let token = CancellationToken::new();
        let options = RequestOptions::new()
            .header("x-trace", "1")
            .timeout(Duration::from_secs(2))
            .cancellation(token.clone());
        assert_eq!(options.headers, vec![("x-trace".to_string(), "1".to_string())]);
        assert_eq!(options.timeout, Some(Duration::from_secs(2)));
        assert!(options.cancellation.is_some());

        let request: EndpointRequest<NoParams, Value> = EndpointRequest::new(NoParams {})
            .with_body(json!({ "a": 1 }))
            .with_options(options);
        assert_eq!(request.body, Some(json!({ "a": 1 })));
    }
}
