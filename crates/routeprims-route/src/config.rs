/// Controls how the registry compiles route parameter schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// When true, parameter schemas reject keys they do not declare.
    pub strict_params: bool,
    /// When true, string path/query values are coerced toward the declared
    /// schema types before validation.
    pub coerce_params: bool,
    /// Maximum number of routes a registry accepts.
    pub max_routes: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            strict_params: false,
            coerce_params: true,
            max_routes: 4096,
        }
    }
}
