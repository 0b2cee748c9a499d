//! Query-string encoding and decoding.
//!
//! Encoding uses `application/x-www-form-urlencoded` rules (space becomes `+`),
//! with keys in sorted order:
//! - strings, numbers and booleans become `key=value`;
//! - arrays repeat the key once per element (`tag=a&tag=b`);
//! - nested objects are written as their compact JSON text;
//! - `null` values, including `null` array elements, are omitted.

use std::collections::BTreeMap;

use serde_json::Value;
use url::form_urlencoded;

use crate::error::QueryError;
use crate::source::QueryValue;

/// Encode a JSON object as a query string, without the leading `?`.
///
/// Fails with [`QueryError::NotAnObject`] when `search` is not an object.
pub fn encode_query(search: &Value) -> Result<String, QueryError> {
    let Value::Object(fields) = search else {
        return Err(QueryError::NotAnObject(kind_name(search)));
    };

    let mut sorted: Vec<(&String, &Value)> = fields.iter().collect();
    sorted.sort_by(|(left, _), (right, _)| left.cmp(right));

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in sorted {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar_text(item) {
                        serializer.append_pair(key, &text);
                    }
                }
            }
            other => {
                if let Some(text) = scalar_text(other) {
                    serializer.append_pair(key, &text);
                }
            }
        }
    }
    Ok(serializer.finish())
}

/// Decode a query string (with or without the leading `?`).
///
/// Repeated keys are collected into [`QueryValue::Multi`] in order of
/// appearance.
pub fn parse_query(query: &str) -> BTreeMap<String, QueryValue> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut params: BTreeMap<String, QueryValue> = BTreeMap::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let value = value.into_owned();
        match params.get_mut(&*key) {
            Some(existing) => existing.push(value),
            None => {
                params.insert(key.into_owned(), QueryValue::Single(value));
            }
        }
    }
    params
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
