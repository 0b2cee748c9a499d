//! Providers of raw path and query parameters for the current navigation.

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde_json::{Map, Value};

use crate::query::parse_query;

/// A raw query-string value: one occurrence of a key, or several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Single(String),
    Multi(Vec<String>),
}

impl QueryValue {
    /// Add another occurrence of the same key.
    pub fn push(&mut self, value: String) {
        match self {
            QueryValue::Single(first) => {
                *self = QueryValue::Multi(vec![std::mem::take(first), value]);
            }
            QueryValue::Multi(values) => values.push(value),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            QueryValue::Single(value) => Value::String(value.clone()),
            QueryValue::Multi(values) => {
                Value::Array(values.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Single(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::Multi(values)
    }
}

/// Supplies raw, untyped parameters for the active navigation context.
pub trait ParamSource: Send + Sync {
    /// Dynamic path segments of the current location.
    fn path_params(&self) -> BTreeMap<String, String>;

    /// Query-string parameters of the current location.
    fn query_params(&self) -> BTreeMap<String, QueryValue>;
}

pub(crate) fn path_params_value(params: BTreeMap<String, String>) -> Value {
    Value::Object(
        params
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect::<Map<String, Value>>(),
    )
}

pub(crate) fn query_params_value(params: &BTreeMap<String, QueryValue>) -> Value {
    Value::Object(
        params
            .iter()
            .map(|(key, value)| (key.clone(), value.to_value()))
            .collect::<Map<String, Value>>(),
    )
}

/// Fixed parameters, for tests and for code running outside a routed context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticParamSource {
    path: BTreeMap<String, String>,
    query: BTreeMap<String, QueryValue>,
}

impl StaticParamSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path.insert(key.into(), value.into());
        self
    }

    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Replace query parameters with those parsed from a raw query string.
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = parse_query(query);
        self
    }
}

impl ParamSource for StaticParamSource {
    fn path_params(&self) -> BTreeMap<String, String> {
        self.path.clone()
    }

    fn query_params(&self) -> BTreeMap<String, QueryValue> {
        self.query.clone()
    }
}

/// Mutable navigation state shared between a router and the routes reading it.
#[derive(Debug, Default)]
pub struct NavigationContext {
    state: RwLock<StaticParamSource>,
}

impl NavigationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current location's path and query parameters.
    pub fn navigate<I, K, V>(&self, path_params: I, query: &str)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let next = StaticParamSource {
            path: path_params
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            query: parse_query(query),
        };
        *self
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = next;
    }

    /// Snapshot of the current parameters.
    pub fn current(&self) -> StaticParamSource {
        self.state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl ParamSource for NavigationContext {
    fn path_params(&self) -> BTreeMap<String, String> {
        self.current().path
    }

    fn query_params(&self) -> BTreeMap<String, QueryValue> {
        self.current().query
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn query_value_push_promotes_to_multi() {
        let mut value = QueryValue::from("a");
        value.push("b".into());
        value.push("c".into());
        assert_eq!(
            value,
            QueryValue::Multi(vec!["a".into(), "b".into(), "c".into()])
        );
        assert_eq!(value.to_value(), json!(["a", "b", "c"]));
    }

    #[test]
    fn static_source_reports_configured_params() {
        let source = StaticParamSource::new()
            .with_path_param("id", "42")
            .with_query("tag=x&tag=y&q=hello");

        assert_eq!(path_params_value(source.path_params()), json!({ "id": "42" }));
        assert_eq!(
            query_params_value(&source.query_params()),
            json!({ "q": "hello", "tag": ["x", "y"] })
        );
    }

    #[test]
    fn navigation_context_replaces_state() {
        let context = NavigationContext::new();
        assert!(context.path_params().is_empty());

        context.navigate([("slug", "intro")], "?page=2");
        assert_eq!(context.path_params().get("slug").map(String::as_str), Some("intro"));
        assert_eq!(
            context.query_params().get("page"),
            Some(&QueryValue::Single("2".into()))
        );

        context.navigate(Vec::<(String, String)>::new(), "");
        assert!(context.path_params().is_empty());
        assert!(context.query_params().is_empty());
    }
}
