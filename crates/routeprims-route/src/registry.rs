use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use routeprims_schema::{Schema, SchemaConfig};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::RegistryConfig;
use crate::error::{Result, RouteError};
use crate::route::{Route, RouteDef, RouteInner, UrlMode};
use crate::source::ParamSource;

/// Summary of a registered route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteInfo {
    pub name: String,
    pub base_url: Option<Url>,
    pub params_schema: Value,
    pub search_schema: Option<Value>,
}

/// Name-keyed registry of routes.
///
/// Names are unique for the registry's lifetime; there is no removal.
pub struct RouteRegistry {
    routes: RwLock<BTreeMap<String, RouteInfo>>,
    source: Arc<dyn ParamSource>,
    config: RegistryConfig,
}

impl RouteRegistry {
    /// Create an empty registry whose routes read parameters from `source`.
    pub fn new(source: Arc<dyn ParamSource>) -> Self {
        Self::with_config(source, RegistryConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(source: Arc<dyn ParamSource>, config: RegistryConfig) -> Self {
        Self {
            routes: RwLock::new(BTreeMap::new()),
            source,
            config,
        }
    }

    /// Register a route.
    ///
    /// Duplicate names are rejected with [`RouteError::AlreadyExists`] before
    /// anything else about the definition is inspected.
    pub fn register<P, S>(&self, def: RouteDef<P, S>) -> Result<Route<P, S>> {
        if def.name.is_empty() {
            return Err(RouteError::EmptyName);
        }

        let mut routes = self.routes.write().unwrap_or_else(PoisonError::into_inner);
        if routes.contains_key(&def.name) {
            return Err(RouteError::AlreadyExists(def.name));
        }
        if routes.len() >= self.config.max_routes {
            return Err(RouteError::CapacityExceeded {
                max: self.config.max_routes,
            });
        }

        let base_url = match &def.url_mode {
            UrlMode::Internal => None,
            UrlMode::External { base_url } => Some(parse_base_url(&def.name, base_url)?),
        };

        let schema_config = SchemaConfig {
            strict_mode: self.config.strict_params,
            coerce_strings: self.config.coerce_params,
        };
        let params_schema = compile(&def.name, def.params_schema.as_ref(), schema_config)?;
        let search_schema = compile(&def.name, def.search_schema.as_ref(), schema_config)?;

        let info = RouteInfo {
            name: def.name.clone(),
            base_url: base_url.clone(),
            params_schema: params_schema.document().clone(),
            search_schema: def.search_schema.as_ref().map(|_| search_schema.document().clone()),
        };
        routes.insert(def.name.clone(), info);
        drop(routes);

        debug!(
            route = %def.name,
            external = base_url.is_some(),
            "registered route"
        );

        Ok(Route::from_inner(RouteInner {
            name: def.name,
            path: def.path,
            params_schema,
            search_schema,
            has_search_schema: def.search_schema.is_some(),
            base_url,
            source: Arc::clone(&self.source),
        }))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Registered route names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    pub fn info(&self, name: &str) -> Option<RouteInfo> {
        self.read().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, RouteInfo>> {
        self.routes.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for RouteRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteRegistry")
            .field("routes", &self.names())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn compile<T>(route: &str, document: Option<&Value>, config: SchemaConfig) -> Result<Schema<T>> {
    match document {
        None => Ok(Schema::permissive_with_config(config)),
        Some(document) => {
            Schema::with_config(document, config).map_err(|source| RouteError::Schema {
                route: route.to_string(),
                source,
            })
        }
    }
}

fn parse_base_url(route: &str, base_url: &str) -> Result<Url> {
    let invalid = |message: String| RouteError::InvalidBaseUrl {
        route: route.to_string(),
        message,
    };

    if base_url.trim().is_empty() {
        return Err(invalid("base URL must not be empty".to_string()));
    }
    let mut url = Url::parse(base_url).map_err(|err| invalid(format!("{base_url}: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid(format!("{base_url}: missing host")));
    }

    // Paths are joined below the base, which needs a trailing slash.
    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::*;
    use crate::route::NoParams;
    use crate::source::StaticParamSource;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct UserParams {
        id: u64,
    }

    fn registry_with(source: StaticParamSource) -> RouteRegistry {
        RouteRegistry::new(Arc::new(source))
    }

    fn user_route_def() -> RouteDef<UserParams> {
        RouteDef::new("user", |p: &UserParams| format!("/users/{}", p.id)).params_schema(json!({
            "type": "object",
            "properties": { "id": { "type": "integer", "minimum": 1 } },
            "required": ["id"]
        }))
    }

    #[test]
    fn register_and_build_internal_url() {
        let registry = registry_with(StaticParamSource::new());
        let route = registry.register(user_route_def()).unwrap();

        assert_eq!(route.name(), "user");
        assert!(!route.is_external());
        assert_eq!(route.url(&UserParams { id: 42 }).unwrap(), "/users/42");
        assert_eq!(route.url(&UserParams { id: 42 }).unwrap(), "/users/42");
    }

    #[test]
    fn duplicate_names_are_rejected_regardless_of_schema() {
        let registry = registry_with(StaticParamSource::new());
        registry.register(user_route_def()).unwrap();

        let same = registry.register(user_route_def());
        assert!(matches!(same, Err(RouteError::AlreadyExists(ref name)) if name == "user"));

        let different: Result<Route<NoParams>> =
            registry.register(RouteDef::new("user", |_: &NoParams| "/other".to_string()));
        assert!(matches!(different, Err(RouteError::AlreadyExists(_))));

        let broken_schema: Result<Route<NoParams>> = registry.register(
            RouteDef::new("user", |_: &NoParams| "/".to_string())
                .params_schema(json!({ "type": "not-a-type" })),
        );
        assert!(matches!(broken_schema, Err(RouteError::AlreadyExists(_))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn error_message_matches_registration_conflict() {
        let registry = registry_with(StaticParamSource::new());
        registry.register(user_route_def()).unwrap();
        let err = registry.register(user_route_def()).unwrap_err();
        assert_eq!(err.to_string(), "Route with name user already exists");
        assert_eq!(err.route(), Some("user"));
    }

    #[test]
    fn empty_name_is_rejected() {
        let registry = registry_with(StaticParamSource::new());
        let result: Result<Route<NoParams>> =
            registry.register(RouteDef::new("", |_: &NoParams| "/".to_string()));
        assert_eq!(result.unwrap_err(), RouteError::EmptyName);
        assert!(registry.is_empty());
    }

    #[test]
    fn external_route_resolves_against_base() {
        let registry = registry_with(StaticParamSource::new());
        let route = registry
            .register(user_route_def().external("https://api.example.com"))
            .unwrap();

        assert!(route.is_external());
        assert_eq!(
            route.url(&UserParams { id: 42 }).unwrap(),
            "https://api.example.com/users/42"
        );
    }

    #[test]
    fn external_route_keeps_base_path_prefix() {
        let registry = registry_with(StaticParamSource::new());
        for base in ["https://api.example.com/v1", "https://api.example.com/v1/"] {
            let route = registry
                .register(
                    RouteDef::new(format!("user-{base}"), |p: &UserParams| {
                        format!("/users/{}", p.id)
                    })
                    .external(base),
                )
                .unwrap();
            assert_eq!(
                route.url(&UserParams { id: 42 }).unwrap(),
                "https://api.example.com/v1/users/42"
            );
            assert_eq!(
                route.base_url().map(Url::as_str),
                Some("https://api.example.com/v1/")
            );
        }
    }

    #[test]
    fn external_route_cannot_leave_base_origin() {
        let registry = registry_with(StaticParamSource::new());
        let route = registry
            .register(
                RouteDef::new("file", |slug: &String| format!("/{slug}"))
                    .external("https://api.example.com/v1/"),
            )
            .unwrap();

        assert_eq!(
            route.url(&"users".to_string()).unwrap(),
            "https://api.example.com/v1/users"
        );
        // A network-path reference stays below the base path.
        assert_eq!(
            route.url(&"/evil.com/steal".to_string()).unwrap(),
            "https://api.example.com/v1/evil.com/steal"
        );
        for slug in ["https://evil.com/steal", "\\\\evil.com/steal", "http://api.example.com/v1"] {
            let err = route.url(&slug.to_string()).unwrap_err();
            assert!(
                matches!(err, RouteError::InvalidPath { ref route, .. } if route == "file"),
                "slug {slug:?} should be rejected, got {err:?}"
            );
        }
        assert!(route
            .url(&"https://evil.com/steal".to_string())
            .unwrap_err()
            .to_string()
            .contains("resolves outside https://api.example.com"));
    }

    #[test]
    fn registration_without_annotation_defaults_search_type() {
        let registry = registry_with(StaticParamSource::new().with_query_param("page", "3"));
        let route = registry
            .register(RouteDef::new("plain", |_: &NoParams| "/plain".to_string()))
            .unwrap();
        assert_eq!(route.use_search_params().unwrap(), json!({ "page": "3" }));
    }

    #[test]
    fn invalid_base_urls_fail_registration() {
        let registry = registry_with(StaticParamSource::new());
        for (index, base) in ["", "not a url", "/relative", "ftp://files.example.com", "mailto:a@b.c"]
            .into_iter()
            .enumerate()
        {
            let result: Result<Route<NoParams>> = registry.register(
                RouteDef::new(format!("ext-{index}"), |_: &NoParams| "/".to_string())
                    .external(base),
            );
            assert!(
                matches!(result, Err(RouteError::InvalidBaseUrl { .. })),
                "base {base:?} should be rejected"
            );
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn invalid_schema_fails_registration() {
        let registry = registry_with(StaticParamSource::new());
        let result: Result<Route<NoParams>> = registry.register(
            RouteDef::new("bad", |_: &NoParams| "/".to_string())
                .params_schema(json!({ "type": "not-a-type" })),
        );
        assert!(matches!(result, Err(RouteError::Schema { .. })));
        assert!(!registry.contains("bad"));
    }

    #[test]
    fn capacity_limit_is_enforced() {
        let registry = RouteRegistry::with_config(
            Arc::new(StaticParamSource::new()),
            RegistryConfig {
                max_routes: 1,
                ..RegistryConfig::default()
            },
        );
        let _: Route<NoParams> = registry
            .register(RouteDef::new("a", |_: &NoParams| "/a".to_string()))
            .unwrap();
        let second: Result<Route<NoParams>> =
            registry.register(RouteDef::new("b", |_: &NoParams| "/b".to_string()));
        assert_eq!(second.unwrap_err(), RouteError::CapacityExceeded { max: 1 });
    }

    #[test]
    fn introspection_lists_sorted_names_and_info() {
        let registry = registry_with(StaticParamSource::new());
        let _: Route<NoParams> = registry
            .register(
                RouteDef::new("zeta", |_: &NoParams| "/z".to_string())
                    .search_schema(json!({ "type": "object" })),
            )
            .unwrap();
        registry.register(user_route_def()).unwrap();

        assert_eq!(registry.names(), vec!["user".to_string(), "zeta".to_string()]);
        let info = registry.info("zeta").unwrap();
        assert_eq!(info.search_schema, Some(json!({ "type": "object" })));
        assert_eq!(registry.info("user").unwrap().search_schema, None);
        assert!(registry.info("missing").is_none());
    }

    #[test]
    fn use_params_validates_and_coerces() {
        let registry = registry_with(StaticParamSource::new().with_path_param("id", "42"));
        let route = registry.register(user_route_def()).unwrap();

        assert_eq!(route.use_params().unwrap(), UserParams { id: 42 });
        assert_eq!(route.use_params().unwrap(), route.use_params().unwrap());
    }

    #[test]
    fn use_params_error_names_the_route() {
        let registry = registry_with(StaticParamSource::new().with_path_param("id", "zero"));
        let route = registry.register(user_route_def()).unwrap();

        let err = route.use_params().unwrap_err();
        assert!(matches!(err, RouteError::InvalidParams { ref route, .. } if route == "user"));
        assert!(err.to_string().starts_with("Invalid params for route user: "));
    }

    #[test]
    fn strict_params_reject_unknown_keys() {
        let registry = RouteRegistry::with_config(
            Arc::new(
                StaticParamSource::new()
                    .with_path_param("id", "1")
                    .with_path_param("extra", "x"),
            ),
            RegistryConfig {
                strict_params: true,
                ..RegistryConfig::default()
            },
        );
        let route = registry.register(user_route_def()).unwrap();
        assert!(matches!(
            route.use_params(),
            Err(RouteError::InvalidParams { .. })
        ));
    }

    #[test]
    fn debug_output_lists_route_names() {
        let registry = registry_with(StaticParamSource::new());
        registry.register(user_route_def()).unwrap();
        assert!(format!("{registry:?}").contains("user"));
    }
}
