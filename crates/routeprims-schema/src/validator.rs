use jsonschema::Validator;
use serde_json::Value;
use tracing::trace;

use crate::error::{Result, SchemaError};

/// Maximum number of validator messages carried in a single error.
pub const MAX_REPORTED_ISSUES: usize = 4;

pub(crate) fn validate_value(value: &Value, validator: &Validator) -> Result<()> {
    let issues: Vec<String> = validator
        .iter_errors(value)
        .take(MAX_REPORTED_ISSUES)
        .map(|err| err.to_string())
        .collect();

    if issues.is_empty() {
        return Ok(());
    }

    trace!(issues = issues.len(), "schema validation failed");
    Err(SchemaError::ValidationFailed { issues })
}
