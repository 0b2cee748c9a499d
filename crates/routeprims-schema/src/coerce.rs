//! String coercion for values that come out of URLs.
//!
//! Path segments and query strings only carry text, so a schema that declares
//! `{"page": {"type": "integer"}}` would reject `{"page": "2"}`. Coercion walks
//! the schema next to the value and rewrites strings into the first declared
//! type they parse as. Only `type`, `properties`, `additionalProperties` and
//! `items` are followed; composition keywords and `$ref` are left alone.

use serde_json::{Map, Number, Value};

/// Rewrite string leaves of `value` toward the types declared by `schema`.
pub fn coerce_strings(schema: &Value, value: &mut Value) {
    let Value::Object(schema) = schema else {
        return;
    };
    let kinds = declared_types(schema);

    if let Value::String(text) = value {
        if kinds.contains(&"array") && !kinds.contains(&"string") {
            let mut items = vec![Value::String(std::mem::take(text))];
            coerce_items(schema, &mut items);
            *value = Value::Array(items);
            return;
        }
        if let Some(coerced) = coerce_scalar(text, &kinds) {
            *value = coerced;
        }
        return;
    }

    match value {
        Value::Array(items) => coerce_items(schema, items),
        Value::Object(fields) => coerce_fields(schema, fields),
        _ => {}
    }
}

fn coerce_items(schema: &Map<String, Value>, items: &mut [Value]) {
    if let Some(item_schema) = schema.get("items") {
        for item in items {
            coerce_strings(item_schema, item);
        }
    }
}

fn coerce_fields(schema: &Map<String, Value>, fields: &mut Map<String, Value>) {
    let properties = schema.get("properties").and_then(Value::as_object);
    let additional = schema
        .get("additionalProperties")
        .filter(|extra| extra.is_object());

    for (key, field) in fields.iter_mut() {
        let field_schema = properties.and_then(|props| props.get(key)).or(additional);
        if let Some(field_schema) = field_schema {
            coerce_strings(field_schema, field);
        }
    }
}

fn declared_types(schema: &Map<String, Value>) -> Vec<&str> {
    match schema.get("type") {
        Some(Value::String(kind)) => vec![kind.as_str()],
        Some(Value::Array(kinds)) => kinds.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn coerce_scalar(text: &str, kinds: &[&str]) -> Option<Value> {
    if kinds.contains(&"string") {
        return None;
    }
    for kind in kinds {
        let coerced = match *kind {
            "integer" => parse_integer(text),
            "number" => parse_integer(text).or_else(|| parse_float(text)),
            "boolean" => match text {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            "null" if text.is_empty() || text == "null" => Some(Value::Null),
            _ => None,
        };
        if coerced.is_some() {
            return coerced;
        }
    }
    None
}

fn parse_integer(text: &str) -> Option<Value> {
    if let Ok(int) = text.parse::<i64>() {
        return Some(Value::from(int));
    }
    text.parse::<u64>().ok().map(Value::from)
}

fn parse_float(text: &str) -> Option<Value> {
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}
