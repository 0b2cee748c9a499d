/// Controls how a schema is compiled and how inputs are prepared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaConfig {
    /// When true, object schemas reject properties they do not declare.
    pub strict_mode: bool,
    /// When true, string inputs are coerced toward the declared scalar type
    /// (`integer`, `number`, `boolean`, `null`) and lone strings are wrapped
    /// for `array` schemas before validation.
    pub coerce_strings: bool,
}

impl SchemaConfig {
    /// Config for values read out of URLs, where every scalar is a string.
    pub fn url_params() -> Self {
        Self {
            strict_mode: false,
            coerce_strings: true,
        }
    }
}

