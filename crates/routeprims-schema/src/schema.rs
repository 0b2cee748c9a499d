use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use jsonschema::Validator;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::coerce::coerce_strings;
use crate::config::SchemaConfig;
use crate::error::{Result, SchemaError};
use crate::strict::close_object_schemas;
use crate::validator::validate_value;

/// A compiled JSON Schema whose validated values deserialize into `T`.
///
/// Cloning is cheap: the compiled validator is shared.
pub struct Schema<T> {
    document: Arc<Value>,
    validator: Option<Arc<Validator>>,
    config: SchemaConfig,
    _output: PhantomData<fn() -> T>,
}

/// Outcome of [`Schema::safe_parse`].
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum SafeParse<T> {
    Success(T),
    Failure(SchemaError),
}

impl<T> SafeParse<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, SafeParse::Success(_))
    }

    /// The parsed value, discarding any failure.
    pub fn ok(self) -> Option<T> {
        match self {
            SafeParse::Success(data) => Some(data),
            SafeParse::Failure(_) => None,
        }
    }

    /// The failure, if parsing did not succeed.
    pub fn error(&self) -> Option<&SchemaError> {
        match self {
            SafeParse::Success(_) => None,
            SafeParse::Failure(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<T> {
        match self {
            SafeParse::Success(data) => Ok(data),
            SafeParse::Failure(err) => Err(err),
        }
    }
}

impl<T> From<Result<T>> for SafeParse<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => SafeParse::Success(data),
            Err(err) => SafeParse::Failure(err),
        }
    }
}

impl<T> Schema<T> {
    /// Compile a schema document with default config.
    pub fn new(document: &Value) -> Result<Self> {
        Self::with_config(document, SchemaConfig::default())
    }

    /// Compile a schema document with explicit config.
    pub fn with_config(document: &Value, config: SchemaConfig) -> Result<Self> {
        let mut to_compile = document.clone();
        if config.strict_mode {
            close_object_schemas(&mut to_compile);
        }

        let validator = jsonschema::validator_for(&to_compile)
            .map_err(|err| SchemaError::CompileFailed(err.to_string()))?;

        Ok(Self {
            document: Arc::new(to_compile),
            validator: Some(Arc::new(validator)),
            config,
            _output: PhantomData,
        })
    }

    /// Compile a schema from a JSON string.
    pub fn from_json(schema_json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(schema_json)
            .map_err(|err| SchemaError::InvalidJson(err.to_string()))?;
        Self::new(&document)
    }

    /// A schema that accepts every value (the empty schema `{}`).
    pub fn permissive() -> Self {
        Self::permissive_with_config(SchemaConfig::default())
    }

    pub fn permissive_with_config(config: SchemaConfig) -> Self {
        Self {
            document: Arc::new(Value::Object(Default::default())),
            validator: None,
            config,
            _output: PhantomData,
        }
    }

    /// The schema document as compiled (after strict-mode rewriting).
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Coerce (when enabled) and validate `input`, returning the checked value.
    pub fn check(&self, input: &Value) -> Result<Value> {
        let mut value = input.clone();
        if self.config.coerce_strings {
            coerce_strings(&self.document, &mut value);
        }
        if let Some(validator) = &self.validator {
            validate_value(&value, validator)?;
        }
        Ok(value)
    }

    pub fn is_valid(&self, input: &Value) -> bool {
        self.check(input).is_ok()
    }
}

impl<T: DeserializeOwned> Schema<T> {
    /// Validate `input` and deserialize it into `T`.
    pub fn parse(&self, input: &Value) -> Result<T> {
        let checked = self.check(input)?;
        serde_json::from_value(checked).map_err(|err| SchemaError::TypeMismatch(err.to_string()))
    }

    /// Like [`Schema::parse`], reporting failure as a value.
    pub fn safe_parse(&self, input: &Value) -> SafeParse<T> {
        self.parse(input).into()
    }

    /// Decode JSON bytes, then parse.
    pub fn parse_slice(&self, payload: &[u8]) -> Result<T> {
        let value: Value = serde_json::from_slice(payload)
            .map_err(|err| SchemaError::InvalidJson(err.to_string()))?;
        self.parse(&value)
    }
}

impl<T> Clone for Schema<T> {
    fn clone(&self) -> Self {
        Self {
            document: Arc::clone(&self.document),
            validator: self.validator.clone(),
            config: self.config,
            _output: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("document", &self.document)
            .field("config", &self.config)
            .field("output", &std::any::type_name::<T>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: u64,
        name: String,
    }

    fn user_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "id": { "type": "integer" },
                "name": { "type": "string" }
            },
            "required": ["id", "name"]
        })
    }

    #[test]
    fn parse_returns_typed_value() {
        let schema = Schema::<User>::new(&user_schema()).unwrap();
        let user = schema.parse(&json!({ "id": 7, "name": "ada" })).unwrap();
        assert_eq!(
            user,
            User {
                id: 7,
                name: "ada".into()
            }
        );
    }

    #[test]
    fn parse_reports_validator_issues() {
        let schema = Schema::<User>::new(&user_schema()).unwrap();
        let err = schema.parse(&json!({ "id": "x", "name": "ada" })).unwrap_err();
        assert!(matches!(err, SchemaError::ValidationFailed { .. }));
        assert!(!err.issues().is_empty());
    }

    #[test]
    fn safe_parse_reports_failure_as_value() {
        let schema = Schema::<User>::new(&user_schema()).unwrap();
        let outcome = schema.safe_parse(&json!({ "id": 1 }));
        assert!(!outcome.is_success());
        assert!(matches!(
            outcome.error(),
            Some(SchemaError::ValidationFailed { .. })
        ));

        let outcome = schema.safe_parse(&json!({ "id": 1, "name": "x" }));
        assert_eq!(outcome.ok().map(|user| user.id), Some(1));
    }

    #[test]
    fn invalid_schema_fails_compile() {
        let invalid = json!({ "type": "definitely-not-a-type" });
        assert!(matches!(
            Schema::<Value>::new(&invalid),
            Err(SchemaError::CompileFailed(_))
        ));
    }

    #[test]
    fn from_json_rejects_malformed_documents() {
        assert!(matches!(
            Schema::<Value>::from_json("{not json"),
            Err(SchemaError::InvalidJson(_))
        ));
        assert!(Schema::<Value>::from_json(r#"{"type":"array"}"#).is_ok());
    }

    #[test]
    fn strict_mode_rejects_additional_properties() {
        let permissive = Schema::<Value>::new(&user_schema()).unwrap();
        let strict = Schema::<Value>::with_config(
            &user_schema(),
            SchemaConfig {
                strict_mode: true,
                ..SchemaConfig::default()
            },
        )
        .unwrap();

        let input = json!({ "id": 1, "name": "ok", "extra": true });
        assert!(permissive.is_valid(&input));
        assert!(matches!(
            strict.check(&input),
            Err(SchemaError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn coercion_applies_only_when_configured() {
        let input = json!({ "id": "7", "name": "ada" });

        let plain = Schema::<User>::new(&user_schema()).unwrap();
        assert!(plain.parse(&input).is_err());

        let coercing = Schema::<User>::with_config(&user_schema(), SchemaConfig::url_params())
            .unwrap();
        assert_eq!(coercing.parse(&input).unwrap().id, 7);
    }

    #[test]
    fn valid_but_mistyped_value_is_type_mismatch() {
        let schema = Schema::<User>::new(&json!({})).unwrap();
        assert!(matches!(
            schema.parse(&json!({ "id": -1, "name": "x" })),
            Err(SchemaError::TypeMismatch(_))
        ));
    }

    #[test]
    fn permissive_accepts_anything() {
        let schema = Schema::<Value>::permissive();
        assert_eq!(schema.parse(&json!([1, "two"])).unwrap(), json!([1, "two"]));
        assert_eq!(schema.document(), &json!({}));
    }

    #[test]
    fn parse_slice_distinguishes_bad_json() {
        let schema = Schema::<User>::new(&user_schema()).unwrap();
        assert!(matches!(
            schema.parse_slice(b"not-json"),
            Err(SchemaError::InvalidJson(_))
        ));
        assert_eq!(
            schema
                .parse_slice(br#"{"id":3,"name":"c"}"#)
                .unwrap()
                .name,
            "c"
        );
    }
}
