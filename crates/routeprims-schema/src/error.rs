/// Errors that can occur while compiling schemas or parsing values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The schema document could not be compiled.
    #[error("failed to compile schema: {0}")]
    CompileFailed(String),

    /// The value failed schema validation.
    #[error("validation failed: {}", .issues.join("; "))]
    ValidationFailed { issues: Vec<String> },

    /// The input is not valid JSON.
    #[error("input is not valid JSON: {0}")]
    InvalidJson(String),

    /// The value passed validation but does not fit the target type.
    #[error("value does not match target type: {0}")]
    TypeMismatch(String),
}

impl SchemaError {
    /// Validation issues reported by the validator, empty for other kinds.
    pub fn issues(&self) -> &[String] {
        match self {
            SchemaError::ValidationFailed { issues } => issues,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;
