//! Stderr logging over `tracing-subscriber`.

use std::str::FromStr;

use tracing::level_filters::LevelFilter;

pub const LOG_LEVEL_ENV: &str = "ROUTEPRIMS_LOG_LEVEL";
pub const LOG_FORMAT_ENV: &str = "ROUTEPRIMS_LOG_FORMAT";

/// A log format or level name that is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseLogError {
    #[error("unknown log format: {0}")]
    Format(String),
    #[error("unknown log level: {0}")]
    Level(String),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ParseLogError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ParseLogError::Format(other.to_string())),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ParseLogError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(ParseLogError::Level(other.to_string())),
        }
    }
}

/// Format and level for [`init_logging`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: LogLevel,
}

impl LoggingConfig {
    /// Read `ROUTEPRIMS_LOG_LEVEL` and `ROUTEPRIMS_LOG_FORMAT`.
    ///
    /// Unset or unrecognized values fall back to the defaults (text, info).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let format = lookup(LOG_FORMAT_ENV)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();
        let level = lookup(LOG_LEVEL_ENV)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();
        Self { format, level }
    }

    /// Install a global stderr subscriber.
    ///
    /// Returns `false` when a global subscriber was already set, in which
    /// case nothing changes.
    pub fn init(self) -> bool {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(self.level.as_filter())
            .with_ansi(false)
            .with_target(true);

        let installed = match self.format {
            LogFormat::Text => subscriber.try_init().is_ok(),
            LogFormat::Json => subscriber.json().flatten_event(true).try_init().is_ok(),
        };
        if installed {
            tracing::debug!(format = ?self.format, level = ?self.level, "logging initialized");
        }
        installed
    }
}

/// Shorthand for `LoggingConfig { format, level }.init()`.
pub fn init_logging(format: LogFormat, level: LogLevel) -> bool {
    LoggingConfig { format, level }.init()
}
